use crate::animation::binding::{AnimationChannel, TargetPath};
use crate::animation::tracks::AnimationSampler;
use crate::errors::Error;
use crate::scene::node::Node;
use crate::scene::transform::NodePose;

/// A keyframe animation clip: samplers, the channels binding them to nodes,
/// and the time range covered by all samplers.
#[derive(Debug, Clone)]
pub struct Animation {
    pub name: String,
    pub samplers: Vec<AnimationSampler>,
    pub channels: Vec<AnimationChannel>,
    start: f32,
    end: f32,
}

impl Animation {
    #[must_use]
    pub fn new(
        name: String,
        samplers: Vec<AnimationSampler>,
        channels: Vec<AnimationChannel>,
    ) -> Self {
        let mut range: Option<(f32, f32)> = None;
        for sampler in &samplers {
            if let (Some(first), Some(last)) = (sampler.start(), sampler.end()) {
                range = Some(match range {
                    Some((s, e)) => (s.min(first), e.max(last)),
                    None => (first, last),
                });
            }
        }
        let (start, end) = range.unwrap_or((0.0, 0.0));

        Self {
            name,
            samplers,
            channels,
            start,
            end,
        }
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> f32 {
        self.start
    }

    #[inline]
    #[must_use]
    pub fn end(&self) -> f32 {
        self.end
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.end - self.start
    }

    /// Samples every channel at `time` into `poses`.
    ///
    /// `poses` is resized to `nodes.len()` and reset to each node's static
    /// TRS first, so nodes without channels keep their rest pose. `time` is
    /// clamped to `[start, end]`. A channel whose sampler has no keyframe
    /// pair around `time` leaves its target at the rest value.
    pub fn evaluate(&self, nodes: &[Node], time: f32, poses: &mut Vec<NodePose>) {
        let time = time.clamp(self.start, self.end);

        poses.clear();
        poses.extend(nodes.iter().map(Node::static_pose));

        for channel in &self.channels {
            let Some(sampler) = self.samplers.get(channel.sampler) else {
                log::debug!(
                    "Animation '{}': channel references missing sampler {}",
                    self.name,
                    channel.sampler
                );
                continue;
            };
            if !sampler.is_evaluable() {
                continue;
            }
            let Some(pose) = poses.get_mut(channel.node) else {
                continue;
            };

            let result = match channel.target {
                TargetPath::Translation => sampler
                    .sample_vec3(time)
                    .map(|v| pose.translation = v.unwrap_or(pose.translation)),
                TargetPath::Rotation => sampler
                    .sample_quat(time)
                    .map(|q| pose.rotation = q.unwrap_or(pose.rotation)),
                TargetPath::Scale => sampler
                    .sample_vec3(time)
                    .map(|v| pose.scale = v.unwrap_or(pose.scale)),
                TargetPath::Weights => Ok(()),
            };

            match result {
                Ok(()) => {}
                Err(Error::UnsupportedFeature(feature)) => {
                    log::warn!(
                        "Animation '{}': skipping channel on node {}: {feature} is not supported",
                        self.name,
                        channel.node
                    );
                }
                Err(err) => {
                    log::warn!(
                        "Animation '{}': skipping channel on node {}: {err}",
                        self.name,
                        channel.node
                    );
                }
            }
        }
    }
}
