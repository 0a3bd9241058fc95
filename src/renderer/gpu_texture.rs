use std::sync::Arc;

use crate::renderer::device::{RenderDevice, TextureDesc};
use crate::renderer::pending::PendingUpload;
use crate::resources::image::MipLevel;

/// A texture holding prebuilt data, copied into its destination during
/// materialization.
pub struct StagingTexture<D: RenderDevice> {
    pub raw: D::Texture,
    pub desc: TextureDesc,
}

/// What a texture still needs before it can be sampled.
///
/// `levels` are written with texture updates; when empty, `staging` (if any)
/// is copied. A payload with neither only requests the shader-resource
/// transition.
pub struct TextureUpload<D: RenderDevice> {
    pub levels: Vec<MipLevel>,
    pub staging: Option<StagingTexture<D>>,
}

impl<D: RenderDevice> TextureUpload<D> {
    #[must_use]
    pub fn from_levels(levels: Vec<MipLevel>) -> Self {
        Self {
            levels,
            staging: None,
        }
    }

    #[must_use]
    pub fn from_staging(staging: StagingTexture<D>) -> Self {
        Self {
            levels: Vec::new(),
            staging: Some(staging),
        }
    }

    /// Data already resident; only the state transition is outstanding.
    #[must_use]
    pub fn transition_only() -> Self {
        Self {
            levels: Vec::new(),
            staging: None,
        }
    }
}

/// A standalone GPU texture, shareable between models through the texture
/// cache.
pub struct GpuTexture<D: RenderDevice> {
    raw: D::Texture,
    desc: TextureDesc,
    sampler: Option<Arc<D::Sampler>>,
    pending: PendingUpload<TextureUpload<D>>,
}

impl<D: RenderDevice> GpuTexture<D> {
    /// Wraps a freshly created texture together with its upload payload.
    #[must_use]
    pub fn new(
        raw: D::Texture,
        desc: TextureDesc,
        sampler: Option<Arc<D::Sampler>>,
        upload: TextureUpload<D>,
    ) -> Self {
        Self {
            raw,
            desc,
            sampler,
            pending: PendingUpload::new(upload),
        }
    }

    #[inline]
    pub fn raw(&self) -> &D::Texture {
        &self.raw
    }

    #[inline]
    pub fn desc(&self) -> &TextureDesc {
        &self.desc
    }

    #[inline]
    pub fn sampler(&self) -> Option<&Arc<D::Sampler>> {
        self.sampler.as_ref()
    }

    #[inline]
    pub fn pending(&self) -> &PendingUpload<TextureUpload<D>> {
        &self.pending
    }

    #[inline]
    pub fn needs_upload(&self) -> bool {
        self.pending.is_pending()
    }
}

impl<D: RenderDevice> std::fmt::Debug for GpuTexture<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuTexture")
            .field("desc", &self.desc)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
