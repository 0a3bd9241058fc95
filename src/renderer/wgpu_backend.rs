//! [`RenderDevice`] and [`DeviceContext`] on top of `wgpu`.
//!
//! `wgpu` tracks resource states itself, so state transitions are accepted
//! and dropped. Texture and buffer updates go through the queue; copies and
//! mip generation are recorded into the context's command encoder and
//! submitted by [`WgpuContext::submit`].

use parking_lot::Mutex;

use crate::errors::{Error, Result};
use crate::renderer::device::{
    BufferDesc, DeviceContext, RenderDevice, StateTransition, SubresourceData, TextureCopy,
    TextureDesc, TextureRegion,
};
use crate::renderer::mipmap::MipmapGenerator;
use crate::resources::texture::{TextureSampler, full_mip_count};

pub struct WgpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
    mipmaps: Mutex<Option<MipmapGenerator>>,
}

impl WgpuDevice {
    #[must_use]
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            mipmaps: Mutex::new(None),
        }
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Starts recording uploads for one model (or a batch of models).
    #[must_use]
    pub fn begin_upload(&self) -> WgpuContext<'_> {
        WgpuContext {
            device: self,
            encoder: self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Model Upload Encoder"),
                }),
        }
    }

    fn write_level(
        &self,
        texture: &wgpu::Texture,
        mip_level: u32,
        origin: wgpu::Origin3d,
        width: u32,
        height: u32,
        data: SubresourceData<'_>,
    ) {
        let (_, block_h) = texture.format().block_dimensions();
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level,
                origin,
                aspect: wgpu::TextureAspect::All,
            },
            data.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(data.stride),
                rows_per_image: Some(height.div_ceil(block_h)),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }
}

fn validate_texture_desc(desc: &TextureDesc) -> Result<()> {
    if desc.width == 0 || desc.height == 0 || desc.array_layers == 0 {
        return Err(Error::Device(format!(
            "texture '{}' has an empty extent {}x{}x{}",
            desc.label, desc.width, desc.height, desc.array_layers
        )));
    }
    let max_mips = full_mip_count(desc.width, desc.height);
    if desc.mip_level_count == 0 || desc.mip_level_count > max_mips {
        return Err(Error::Device(format!(
            "texture '{}' requests {} mip levels, at most {max_mips} fit",
            desc.label, desc.mip_level_count
        )));
    }
    Ok(())
}

impl RenderDevice for WgpuDevice {
    type Texture = wgpu::Texture;
    type Buffer = wgpu::Buffer;
    type Sampler = wgpu::Sampler;

    fn create_texture(
        &self,
        desc: &TextureDesc,
        initial_data: Option<&[SubresourceData<'_>]>,
    ) -> Result<wgpu::Texture> {
        validate_texture_desc(desc)?;

        let mut usage = desc.usage;
        if initial_data.is_some() {
            usage |= wgpu::TextureUsages::COPY_DST;
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&desc.label),
            size: wgpu::Extent3d {
                width: desc.width,
                height: desc.height,
                depth_or_array_layers: desc.array_layers,
            },
            mip_level_count: desc.mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: desc.format,
            usage,
            view_formats: &[],
        });

        if let Some(levels) = initial_data {
            for (mip, data) in levels.iter().take(desc.mip_level_count as usize).enumerate() {
                let mip = mip as u32;
                let (width, height) = desc.mip_extent(mip);
                self.write_level(&texture, mip, wgpu::Origin3d::ZERO, width, height, *data);
            }
        }

        Ok(texture)
    }

    fn create_buffer(&self, desc: &BufferDesc) -> Result<wgpu::Buffer> {
        if desc.size % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
            return Err(Error::Device(format!(
                "buffer '{}' size {} is not a multiple of {}",
                desc.label,
                desc.size,
                wgpu::COPY_BUFFER_ALIGNMENT
            )));
        }
        Ok(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&desc.label),
            size: desc.size,
            usage: desc.usage,
            mapped_at_creation: false,
        }))
    }

    fn create_sampler(&self, desc: &TextureSampler) -> Result<wgpu::Sampler> {
        // Anisotropic filtering is only valid with all-linear filtering.
        let all_linear = desc.mag_filter == wgpu::FilterMode::Linear
            && desc.min_filter == wgpu::FilterMode::Linear
            && desc.mipmap_filter == wgpu::MipmapFilterMode::Linear;
        let anisotropy_clamp = if all_linear {
            desc.anisotropy_clamp.clamp(1, 16)
        } else {
            1
        };

        Ok(self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Model Sampler"),
            address_mode_u: desc.address_mode_u,
            address_mode_v: desc.address_mode_v,
            address_mode_w: desc.address_mode_w,
            mag_filter: desc.mag_filter,
            min_filter: desc.min_filter,
            mipmap_filter: desc.mipmap_filter,
            anisotropy_clamp,
            ..Default::default()
        }))
    }
}

/// Upload recording for a [`WgpuDevice`].
pub struct WgpuContext<'a> {
    device: &'a WgpuDevice,
    encoder: wgpu::CommandEncoder,
}

impl WgpuContext<'_> {
    /// Submits recorded copies and mip generation.
    pub fn submit(self) -> wgpu::SubmissionIndex {
        self.device.queue.submit(Some(self.encoder.finish()))
    }
}

impl DeviceContext<WgpuDevice> for WgpuContext<'_> {
    fn update_texture(
        &mut self,
        texture: &wgpu::Texture,
        mip_level: u32,
        slice: u32,
        region: TextureRegion,
        data: SubresourceData<'_>,
    ) {
        self.device.write_level(
            texture,
            mip_level,
            wgpu::Origin3d {
                x: region.x,
                y: region.y,
                z: slice,
            },
            region.width,
            region.height,
            data,
        );
    }

    fn update_buffer(&mut self, buffer: &wgpu::Buffer, offset: u64, data: &[u8]) {
        self.device.queue.write_buffer(buffer, offset, data);
    }

    fn copy_texture(&mut self, src: &wgpu::Texture, dst: &wgpu::Texture, copy: TextureCopy) {
        self.encoder.copy_texture_to_texture(
            wgpu::TexelCopyTextureInfo {
                texture: src,
                mip_level: copy.src_mip,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyTextureInfo {
                texture: dst,
                mip_level: copy.dst_mip,
                origin: wgpu::Origin3d {
                    x: copy.dst_x,
                    y: copy.dst_y,
                    z: copy.dst_slice,
                },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::Extent3d {
                width: copy.width,
                height: copy.height,
                depth_or_array_layers: 1,
            },
        );
    }

    fn generate_mips(&mut self, texture: &wgpu::Texture) {
        let mut mipmaps = self.device.mipmaps.lock();
        mipmaps
            .get_or_insert_with(|| MipmapGenerator::new(&self.device.device))
            .generate(&self.device.device, &mut self.encoder, texture);
    }

    fn transition_resource_states(&mut self, transitions: &[StateTransition<'_, WgpuDevice>]) {
        log::trace!("{} state transitions handled by wgpu", transitions.len());
    }
}
