use glam::{Quat, Vec3, Vec4};

use crate::errors::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
    /// Recognized so that documents using it load, but never sampled.
    CubicSpline,
}

/// Bracketing keyframe pair for a query time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyframeSpan {
    pub index: usize,
    pub next: usize,
    /// Interpolation factor in `[0, 1]` between `index` and `next`.
    pub factor: f32,
}

/// One keyframe track: strictly increasing input times and the values at
/// those times. Vector outputs are stored in `xyz`, quaternions as `xyzw`.
#[derive(Debug, Clone)]
pub struct AnimationSampler {
    pub inputs: Vec<f32>,
    pub outputs: Vec<Vec4>,
    pub interpolation: InterpolationMode,
}

impl AnimationSampler {
    #[must_use]
    pub fn new(inputs: Vec<f32>, outputs: Vec<Vec4>, interpolation: InterpolationMode) -> Self {
        Self {
            inputs,
            outputs,
            interpolation,
        }
    }

    /// A channel can only be evaluated when every input has an output.
    #[inline]
    #[must_use]
    pub fn is_evaluable(&self) -> bool {
        !self.inputs.is_empty() && self.inputs.len() <= self.outputs.len()
    }

    #[must_use]
    pub fn start(&self) -> Option<f32> {
        self.inputs.first().copied()
    }

    #[must_use]
    pub fn end(&self) -> Option<f32> {
        self.inputs.last().copied()
    }

    /// Finds the first keyframe pair `[inputs[i], inputs[i + 1]]` that
    /// contains `time`.
    ///
    /// Returns `None` when no pair brackets `time`: fewer than two keyframes,
    /// `time` outside this sampler's range, or NaN. The channel then leaves
    /// its target untouched.
    pub fn locate(&self, time: f32) -> Result<Option<KeyframeSpan>> {
        if self.interpolation == InterpolationMode::CubicSpline {
            return Err(Error::UnsupportedFeature(
                "CUBICSPLINE animation interpolation".to_string(),
            ));
        }

        let len = self.inputs.len();
        if len == 0 {
            return Err(Error::MalformedInput(
                "animation sampler has no keyframes".to_string(),
            ));
        }

        if len < 2 || time.is_nan() || time < self.inputs[0] || time > self.inputs[len - 1] {
            return Ok(None);
        }

        // First keyframe at or after `time`. An exact interior key time
        // belongs to the pair ending at it.
        let index = self.inputs.partition_point(|&t| t < time).max(1) - 1;
        let next = index + 1;

        let factor = match self.interpolation {
            InterpolationMode::Step => 0.0,
            _ => {
                let t0 = self.inputs[index];
                let dt = self.inputs[next] - t0;
                if dt > f32::EPSILON {
                    ((time - t0) / dt).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            }
        };

        Ok(Some(KeyframeSpan {
            index,
            next,
            factor,
        }))
    }

    fn output_pair(&self, span: KeyframeSpan) -> Result<(Vec4, Vec4)> {
        match (self.outputs.get(span.index), self.outputs.get(span.next)) {
            (Some(&a), Some(&b)) => Ok((a, b)),
            _ => Err(Error::out_of_bounds("animation sampler output", span.next)),
        }
    }

    /// Samples a translation or scale track. `None` when `time` is not
    /// covered by any keyframe pair.
    pub fn sample_vec3(&self, time: f32) -> Result<Option<Vec3>> {
        let Some(span) = self.locate(time)? else {
            return Ok(None);
        };
        let (a, b) = self.output_pair(span)?;
        Ok(Some(a.truncate().lerp(b.truncate(), span.factor)))
    }

    /// Samples a rotation track. The result is renormalized after slerp to
    /// keep it a unit quaternion.
    pub fn sample_quat(&self, time: f32) -> Result<Option<Quat>> {
        let Some(span) = self.locate(time)? else {
            return Ok(None);
        };
        let (a, b) = self.output_pair(span)?;
        let q0 = Quat::from_vec4(a);
        let q1 = Quat::from_vec4(b);
        Ok(Some(q0.slerp(q1, span.factor).normalize()))
    }
}
