//! One-shot GPU materialization of a loaded model.
//!
//! Every texture, atlas region and buffer is created with its upload data
//! attached as a [`PendingUpload`](crate::renderer::pending::PendingUpload).
//! Materializing a model takes each payload and records the uploads. A
//! resource shared with a model that was materialized earlier has no payload
//! left and is skipped.

use glam::UVec2;
use smallvec::SmallVec;

use crate::model::{Model, ModelBuffer, TextureInfo};
use crate::renderer::device::{
    DeviceContext, RenderDevice, ResourceState, StateTransition, SubresourceData, TextureCopy,
    TextureDesc, TextureRegion,
};
use crate::renderer::gpu_texture::{StagingTexture, TextureUpload};
use crate::renderer::pending::PendingUpload;

/// State transitions recorded while materializing one model.
type Transitions<'a, D> = SmallVec<[StateTransition<'a, D>; 16]>;

struct UploadTarget<'a, D: RenderDevice> {
    texture: &'a D::Texture,
    desc: &'a TextureDesc,
    pending: &'a PendingUpload<TextureUpload<D>>,
    origin: UVec2,
    slice: u32,
    standalone: bool,
}

fn upload_target<D: RenderDevice>(info: &TextureInfo<D>) -> Option<UploadTarget<'_, D>> {
    if let Some(allocation) = &info.atlas_allocation {
        let atlas = allocation.atlas();
        return Some(UploadTarget {
            texture: atlas.texture(),
            desc: atlas.desc(),
            pending: allocation.pending(),
            origin: allocation.origin(),
            slice: allocation.slice(),
            standalone: false,
        });
    }
    info.texture.as_ref().map(|texture| UploadTarget {
        texture: texture.raw(),
        desc: texture.desc(),
        pending: texture.pending(),
        origin: UVec2::ZERO,
        slice: 0,
        standalone: true,
    })
}

/// Number of staging mips that can be copied into `dst`. Block-compressed
/// mips smaller than one block cannot be copied.
fn copyable_mip_count(staging: &TextureDesc, dst: &TextureDesc) -> u32 {
    let mut count = staging.mip_level_count.min(dst.mip_level_count);
    if staging.format.is_compressed() {
        let (block_w, block_h) = staging.format.block_dimensions();
        while count > 0 {
            let (w, h) = staging.mip_extent(count - 1);
            if w >= block_w && h >= block_h {
                break;
            }
            count -= 1;
        }
    }
    count
}

/// Copy extent of `mip`. Block-compressed extents are rounded up to whole
/// blocks; atlas regions are padded to match.
fn copy_extent(staging: &TextureDesc, mip: u32) -> (u32, u32) {
    let (width, height) = staging.mip_extent(mip);
    if !staging.format.is_compressed() {
        return (width, height);
    }
    let (block_w, block_h) = staging.format.block_dimensions();
    (width.next_multiple_of(block_w), height.next_multiple_of(block_h))
}

fn copy_from_staging<D: RenderDevice, C: DeviceContext<D>>(
    ctx: &mut C,
    staging: &StagingTexture<D>,
    target: &UploadTarget<'_, D>,
) {
    let mip_count = copyable_mip_count(&staging.desc, target.desc);
    for mip in 0..mip_count {
        let (width, height) = copy_extent(&staging.desc, mip);
        ctx.copy_texture(
            &staging.raw,
            target.texture,
            TextureCopy {
                src_mip: mip,
                dst_mip: mip,
                dst_slice: target.slice,
                dst_x: target.origin.x >> mip,
                dst_y: target.origin.y >> mip,
                width,
                height,
            },
        );
    }
}

fn upload_texture<'a, D: RenderDevice, C: DeviceContext<D>>(
    ctx: &mut C,
    index: usize,
    info: &'a TextureInfo<D>,
    transitions: &mut Transitions<'a, D>,
) {
    let Some(target) = upload_target(info) else {
        return;
    };
    let Some(upload) = target.pending.take() else {
        log::trace!("Texture {index} was already uploaded by another model");
        return;
    };

    if !upload.levels.is_empty() {
        for (mip, level) in upload.levels.iter().enumerate() {
            let mip = mip as u32;
            ctx.update_texture(
                target.texture,
                mip,
                target.slice,
                TextureRegion {
                    x: target.origin.x >> mip,
                    y: target.origin.y >> mip,
                    width: level.width,
                    height: level.height,
                },
                SubresourceData {
                    data: &level.data,
                    stride: level.stride,
                },
            );
        }
        if upload.levels.len() == 1 && target.desc.mip_level_count > 1 && target.standalone {
            ctx.generate_mips(target.texture);
        }
        log::trace!("Uploaded {} level(s) of texture {index}", upload.levels.len());
    } else if let Some(staging) = &upload.staging {
        copy_from_staging(ctx, staging, &target);
        log::trace!("Copied staging data into texture {index}");
    }

    // Atlas textures are shared by many allocations; their owner manages
    // their state.
    if target.standalone {
        transitions.push(StateTransition::texture(
            target.texture,
            ResourceState::ShaderResource,
        ));
    }
}

fn upload_buffer<'a, D: RenderDevice, C: DeviceContext<D>>(
    ctx: &mut C,
    buffer: &'a ModelBuffer<D>,
    transitions: &mut Transitions<'a, D>,
) {
    let Some(data) = buffer.pending().take() else {
        return;
    };
    ctx.update_buffer(buffer.raw(), buffer.offset(), &data);
    log::trace!(
        "Uploaded {} {:?} bytes at offset {}",
        data.len(),
        buffer.kind(),
        buffer.offset()
    );

    // Pool buffers are shared by many allocations; their owner manages
    // their state.
    if !buffer.is_pooled() {
        transitions.push(StateTransition::buffer(
            buffer.raw(),
            buffer.kind().ready_state(),
        ));
    }
}

/// Records all pending uploads of `model` and submits their state
/// transitions in one batch.
pub(crate) fn upload_model_resources<D: RenderDevice, C: DeviceContext<D>>(
    model: &Model<D>,
    ctx: &mut C,
) {
    let mut transitions: Transitions<'_, D> = SmallVec::new();

    for (index, info) in model.textures().iter().enumerate() {
        upload_texture(ctx, index, info, &mut transitions);
    }

    for buffer in [model.vertex_buffer(), model.index_buffer()]
        .into_iter()
        .flatten()
    {
        upload_buffer(ctx, buffer, &mut transitions);
    }

    if !transitions.is_empty() {
        ctx.transition_resource_states(&transitions);
    }
}
