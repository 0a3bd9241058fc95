/// Defines the node property an animation channel drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    Translation,
    Rotation,
    Scale,
    /// Morph target weights. Recognized, never evaluated.
    Weights,
}

/// Binds the output of `sampler` to `target` on node `node`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationChannel {
    pub sampler: usize,
    pub node: usize,
    pub target: TargetPath,
}
