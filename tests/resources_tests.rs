//! Resource tests
//!
//! Tests for:
//! - Alpha cutoff policy across materials sharing a texture
//! - Alpha remapping and CPU mip chains
//! - Stub checkerboard
//! - ResourceCache: weak entries, stale eviction, concurrent publish
//! - Atlas placement and UV scale/bias

mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use glam::{UVec2, Vec4};
use scene_runtime::assets::atlas::{AtlasAllocator, AtlasConfig, ShelfAtlasAllocator};
use scene_runtime::assets::cache::{CacheLookup, ResourceCache};
use scene_runtime::assets::document::MaterialRecord;
use scene_runtime::errors::Error;
use scene_runtime::renderer::gpu_texture::TextureUpload;
use scene_runtime::resources::image::{
    CHECKERBOARD_SIZE, ImageData, checkerboard, generate_mip_levels, prepare_texture_levels,
    remap_alpha,
};
use scene_runtime::resources::material::{AlphaMode, Material, TextureSlot, alpha_cutoff_for_texture};

use common::{MockDevice, base_color_material};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn material(alpha_mode: AlphaMode, cutoff: Option<f32>) -> Material {
    Material::from_record(0, &base_color_material(0, alpha_mode, cutoff))
}

fn rgba_image(width: u32, height: u32, alpha: u8) -> ImageData {
    ImageData {
        width,
        height,
        components: 4,
        pixels: [200, 100, 50, alpha].repeat((width * height) as usize),
    }
}

// ============================================================================
// Materials
// ============================================================================

#[test]
fn material_record_fills_slots() {
    let m = material(AlphaMode::Mask, None);
    assert_eq!(m.texture(TextureSlot::BaseColor), Some(0));
    assert_eq!(m.texture(TextureSlot::Normal), None);
    assert!(approx_eq(m.alpha_cutoff, 0.5));
    assert_eq!(m.name, "Material_0");
}

#[test]
fn opaque_materials_do_not_remap() {
    let materials = vec![material(AlphaMode::Opaque, None)];
    assert_eq!(alpha_cutoff_for_texture(&materials, 0), 0.0);
}

#[test]
fn mask_material_contributes_its_cutoff() {
    let materials = vec![
        material(AlphaMode::Opaque, None),
        material(AlphaMode::Mask, Some(0.3)),
    ];
    assert!(approx_eq(alpha_cutoff_for_texture(&materials, 0), 0.3));
}

#[test]
fn differing_mask_cutoffs_use_the_smallest() {
    common::init_logger();
    let materials = vec![
        material(AlphaMode::Mask, Some(0.7)),
        material(AlphaMode::Mask, Some(0.4)),
    ];
    assert!(approx_eq(alpha_cutoff_for_texture(&materials, 0), 0.4));
}

#[test]
fn mask_mixed_with_blend_disables_remap() {
    common::init_logger();
    let materials = vec![
        material(AlphaMode::Mask, Some(0.6)),
        material(AlphaMode::Blend, None),
    ];
    assert_eq!(alpha_cutoff_for_texture(&materials, 0), 0.0);
}

#[test]
fn only_base_color_usage_counts() {
    let mut record = MaterialRecord {
        alpha_mode: AlphaMode::Mask,
        ..Default::default()
    };
    record.textures.push(scene_runtime::assets::document::TextureBinding {
        slot: TextureSlot::Emissive,
        texture: 0,
        tex_coord: 0,
    });
    let materials = vec![Material::from_record(0, &record)];
    assert_eq!(alpha_cutoff_for_texture(&materials, 0), 0.0);
}

#[test]
fn atlas_placement_updates_matching_slots() {
    let mut m = material(AlphaMode::Opaque, None);
    let scale_bias = Vec4::new(0.5, 0.25, 0.125, 0.0);
    m.set_atlas_placement(0, scale_bias, 2);
    m.set_atlas_placement(1, Vec4::ZERO, 3);

    let slot = TextureSlot::BaseColor.index();
    assert_eq!(m.uv_scale_bias[slot], scale_bias);
    assert_eq!(m.texture_slices[slot], 2);
    assert_eq!(m.uv_scale_bias[TextureSlot::Normal.index()], Vec4::new(1.0, 1.0, 0.0, 0.0));
}

// ============================================================================
// Alpha Remap & Mips
// ============================================================================

#[test]
fn alpha_remap_never_lowers_alpha() {
    for cutoff in [0.1_f32, 0.25, 0.5, 0.9, 1.0] {
        for a in 0..=255u8 {
            assert!(remap_alpha(a, cutoff) >= a, "a={a} cutoff={cutoff}");
        }
    }
}

#[test]
fn alpha_remap_is_monotonic() {
    let mut previous = 0;
    for a in 0..=255u8 {
        let r = remap_alpha(a, 0.5);
        assert!(r >= previous);
        previous = r;
    }
}

#[test]
fn rgb_images_expand_to_opaque_rgba() {
    let img = ImageData {
        width: 2,
        height: 1,
        components: 3,
        pixels: vec![1, 2, 3, 4, 5, 6],
    };
    let levels = prepare_texture_levels(&img, 0.5, 1).unwrap();
    assert_eq!(levels.len(), 1);
    assert_eq!(levels[0].stride, 8);
    assert_eq!(levels[0].data, vec![1, 2, 3, 255, 4, 5, 6, 255]);
}

#[test]
fn cutoff_remaps_alpha_of_rgba_images() {
    let levels = prepare_texture_levels(&rgba_image(1, 1, 0), 0.5, 1).unwrap();
    assert_eq!(levels[0].data[3], remap_alpha(0, 0.5));

    let untouched = prepare_texture_levels(&rgba_image(1, 1, 0), 0.0, 1).unwrap();
    assert_eq!(untouched[0].data[3], 0);
}

#[test]
fn mip_chain_halves_until_one_texel() {
    let levels = prepare_texture_levels(&rgba_image(8, 2, 255), 0.0, 5).unwrap();
    let sizes: Vec<(u32, u32)> = levels.iter().map(|l| (l.width, l.height)).collect();
    assert_eq!(sizes, vec![(8, 2), (4, 1), (2, 1), (1, 1), (1, 1)]);
    for level in &levels {
        assert_eq!(level.data.len(), (level.stride * level.height) as usize);
        assert_eq!(&level.data[..4], &[200, 100, 50, 255]);
    }
}

#[test]
fn compressed_mip_generation_is_unsupported() {
    let mut levels = prepare_texture_levels(&rgba_image(4, 4, 255), 0.0, 1).unwrap();
    let err = generate_mip_levels(&mut levels, 3, wgpu::TextureFormat::Bc1RgbaUnorm).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFeature(_)));
}

#[test]
fn unsupported_component_count_is_rejected() {
    let img = ImageData {
        width: 1,
        height: 1,
        components: 2,
        pixels: vec![0, 0],
    };
    assert!(matches!(
        prepare_texture_levels(&img, 0.0, 1),
        Err(Error::UnsupportedFeature(_))
    ));
}

#[test]
fn checkerboard_has_four_texel_cells() {
    let img = checkerboard();
    assert_eq!((img.width, img.height), (CHECKERBOARD_SIZE, CHECKERBOARD_SIZE));
    let at = |x: u32, y: u32| {
        let o = ((y * img.width + x) * 4) as usize;
        &img.pixels[o..o + 4]
    };
    assert_eq!(at(0, 0), &[255, 255, 255, 255]);
    assert_eq!(at(3, 3), &[255, 255, 255, 255]);
    assert_eq!(at(4, 0), &[0, 0, 0, 255]);
    assert_eq!(at(4, 4), &[255, 255, 255, 255]);
}

// ============================================================================
// ResourceCache
// ============================================================================

#[test]
fn cache_hit_while_resource_alive() {
    let cache = ResourceCache::new();
    let value = cache.publish("a.png", Arc::new(5));
    match cache.lookup("a.png") {
        CacheLookup::Hit(hit) => assert!(Arc::ptr_eq(&hit, &value)),
        _ => panic!("expected a hit"),
    }
}

#[test]
fn cache_entries_do_not_keep_resources_alive() {
    let cache = ResourceCache::new();
    drop(cache.publish("a.png", Arc::new(5)));

    assert_eq!(cache.len(), 1);
    assert!(matches!(cache.lookup("a.png"), CacheLookup::Stale));
    assert!(cache.is_empty());
    assert!(matches!(cache.lookup("a.png"), CacheLookup::Miss));
}

#[test]
fn publish_adopts_live_entry() {
    let cache = ResourceCache::new();
    let first = cache.publish("k", Arc::new(1));
    let second = cache.publish("k", Arc::new(2));
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*second, 1);
}

#[test]
fn purge_removes_only_stale_entries() {
    let cache = ResourceCache::new();
    let _alive = cache.publish("alive", Arc::new(1));
    drop(cache.publish("dead", Arc::new(2)));
    assert_eq!(cache.purge_stale(), 1);
    assert!(cache.get("alive").is_some());
}

#[test]
fn concurrent_publishers_share_one_resource() {
    let cache = Arc::new(ResourceCache::<String>::new());
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let resource = cache
                    .get("shared")
                    .unwrap_or_else(|| cache.publish("shared", Arc::new(format!("thread {i}"))));
                resource
            })
        })
        .collect();

    let results: Vec<Arc<String>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for r in &results[1..] {
        assert!(Arc::ptr_eq(&results[0], r));
    }
    assert_eq!(cache.len(), 1);
}

// ============================================================================
// Atlas
// ============================================================================

fn small_atlas() -> ShelfAtlasAllocator<MockDevice> {
    ShelfAtlasAllocator::new(AtlasConfig {
        size: 256,
        layers: 2,
        mip_levels: 3,
    })
}

#[test]
fn atlas_regions_are_aligned_and_do_not_overlap() {
    let device = MockDevice::default();
    let atlas = small_atlas();

    let a = atlas
        .allocate_texture_space(&device, wgpu::TextureFormat::Rgba8Unorm, 30, 30, "a", TextureUpload::transition_only())
        .unwrap();
    let b = atlas
        .allocate_texture_space(&device, wgpu::TextureFormat::Rgba8Unorm, 30, 30, "b", TextureUpload::transition_only())
        .unwrap();

    // Alignment is 2^(3 - 1) = 4 texels.
    assert_eq!(a.origin(), UVec2::ZERO);
    assert_eq!(b.origin(), UVec2::new(32, 0));
    assert_eq!(a.size(), UVec2::new(30, 30));
    assert!(Arc::ptr_eq(a.atlas(), b.atlas()));
    assert_eq!(device.texture_count(), 1);
}

#[test]
fn compressed_atlas_regions_cover_whole_blocks() {
    let device = MockDevice::default();
    let atlas: ShelfAtlasAllocator<MockDevice> = ShelfAtlasAllocator::new(AtlasConfig {
        size: 64,
        layers: 1,
        mip_levels: 1,
    });
    let format = wgpu::TextureFormat::Bc1RgbaUnorm;

    let a = atlas
        .allocate_texture_space(&device, format, 6, 6, "", TextureUpload::transition_only())
        .unwrap();
    let b = atlas
        .allocate_texture_space(&device, format, 6, 6, "", TextureUpload::transition_only())
        .unwrap();

    // 6x6 BC1 occupies two 4x4 blocks per axis.
    assert_eq!(a.origin(), UVec2::ZERO);
    assert_eq!(b.origin(), UVec2::new(8, 0));
    assert_eq!(b.size(), UVec2::new(6, 6));
}

#[test]
fn atlas_uv_scale_bias_maps_region() {
    let device = MockDevice::default();
    let atlas = small_atlas();
    atlas
        .allocate_texture_space(&device, wgpu::TextureFormat::Rgba8Unorm, 64, 64, "a", TextureUpload::transition_only())
        .unwrap();
    let b = atlas
        .allocate_texture_space(&device, wgpu::TextureFormat::Rgba8Unorm, 128, 32, "b", TextureUpload::transition_only())
        .unwrap();

    assert_eq!(b.uv_scale_bias(), Vec4::new(0.5, 0.125, 0.25, 0.0));
}

#[test]
fn atlas_finds_live_allocations_by_key() {
    let device = MockDevice::default();
    let atlas = small_atlas();
    let a = atlas
        .allocate_texture_space(&device, wgpu::TextureFormat::Rgba8Unorm, 16, 16, "tex/a.png", TextureUpload::transition_only())
        .unwrap();

    let found = atlas.find_allocation("tex/a.png").unwrap();
    assert!(Arc::ptr_eq(&a, &found));
    drop((a, found));
    assert!(atlas.find_allocation("tex/a.png").is_none());
}

#[test]
fn atlas_spills_into_next_layer_then_fails() {
    let device = MockDevice::default();
    let atlas = small_atlas();
    let format = wgpu::TextureFormat::Rgba8Unorm;

    let first = atlas
        .allocate_texture_space(&device, format, 256, 256, "", TextureUpload::transition_only())
        .unwrap();
    let second = atlas
        .allocate_texture_space(&device, format, 256, 256, "", TextureUpload::transition_only())
        .unwrap();
    assert_eq!((first.slice(), second.slice()), (0, 1));

    let err = atlas
        .allocate_texture_space(&device, format, 8, 8, "", TextureUpload::transition_only())
        .unwrap_err();
    assert!(matches!(err, Error::Atlas(_)));
}
