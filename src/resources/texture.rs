/// Sampler state for a texture. Textures without a document sampler use
/// [`TextureSampler::default`] (linear filtering, repeat wrapping).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureSampler {
    pub address_mode_u: wgpu::AddressMode,
    pub address_mode_v: wgpu::AddressMode,
    pub address_mode_w: wgpu::AddressMode,
    pub mag_filter: wgpu::FilterMode,
    pub min_filter: wgpu::FilterMode,
    pub mipmap_filter: wgpu::MipmapFilterMode,
    // 1 = off
    pub anisotropy_clamp: u16,
}

impl Default for TextureSampler {
    fn default() -> Self {
        Self {
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            anisotropy_clamp: 1,
        }
    }
}

/// Number of levels in a full mip chain down to 1x1.
#[inline]
#[must_use]
pub fn full_mip_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Size of `mip_level` for a texture of `width` x `height`, never below 1.
#[inline]
#[must_use]
pub fn mip_extent(width: u32, height: u32, mip_level: u32) -> (u32, u32) {
    ((width >> mip_level).max(1), (height >> mip_level).max(1))
}
