use glam::{Vec3, Vec4};

use crate::assets::document::MaterialRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlphaMode {
    #[default]
    Opaque,
    Mask,
    Blend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    BaseColor = 0,
    MetallicRoughness = 1,
    Normal = 2,
    Occlusion = 3,
    Emissive = 4,
}

impl TextureSlot {
    pub const COUNT: usize = 5;

    pub const ALL: [TextureSlot; Self::COUNT] = [
        TextureSlot::BaseColor,
        TextureSlot::MetallicRoughness,
        TextureSlot::Normal,
        TextureSlot::Occlusion,
        TextureSlot::Emissive,
    ];

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Default mask threshold when a material does not specify one.
pub const DEFAULT_ALPHA_CUTOFF: f32 = 0.5;

/// Identity UV transform: `uv * xy + zw`.
pub const IDENTITY_UV_SCALE_BIAS: Vec4 = Vec4::new(1.0, 1.0, 0.0, 0.0);

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub alpha_mode: AlphaMode,
    pub alpha_cutoff: f32,
    pub base_color_factor: Vec4,
    pub emissive_factor: Vec3,
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub double_sided: bool,

    /// Model texture index per slot.
    pub textures: [Option<usize>; TextureSlot::COUNT],
    pub tex_coord_sets: [u32; TextureSlot::COUNT],
    /// Atlas placement per slot; identity for standalone textures.
    pub uv_scale_bias: [Vec4; TextureSlot::COUNT],
    /// Atlas array slice per slot.
    pub texture_slices: [u32; TextureSlot::COUNT],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            alpha_mode: AlphaMode::Opaque,
            alpha_cutoff: DEFAULT_ALPHA_CUTOFF,
            base_color_factor: Vec4::ONE,
            emissive_factor: Vec3::ZERO,
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            double_sided: false,
            textures: [None; TextureSlot::COUNT],
            tex_coord_sets: [0; TextureSlot::COUNT],
            uv_scale_bias: [IDENTITY_UV_SCALE_BIAS; TextureSlot::COUNT],
            texture_slices: [0; TextureSlot::COUNT],
        }
    }
}

impl Material {
    #[must_use]
    pub fn from_record(index: usize, record: &MaterialRecord) -> Self {
        let mut material = Self {
            name: record
                .name
                .clone()
                .unwrap_or_else(|| format!("Material_{index}")),
            alpha_mode: record.alpha_mode,
            alpha_cutoff: record.alpha_cutoff.unwrap_or(DEFAULT_ALPHA_CUTOFF),
            base_color_factor: record.base_color_factor,
            emissive_factor: record.emissive_factor,
            metallic_factor: record.metallic_factor,
            roughness_factor: record.roughness_factor,
            double_sided: record.double_sided,
            ..Default::default()
        };

        for binding in &record.textures {
            let slot = binding.slot.index();
            material.textures[slot] = Some(binding.texture);
            material.tex_coord_sets[slot] = binding.tex_coord;
        }

        material
    }

    #[inline]
    #[must_use]
    pub fn texture(&self, slot: TextureSlot) -> Option<usize> {
        self.textures[slot.index()]
    }

    /// Points every slot that samples `texture` at its atlas region.
    pub fn set_atlas_placement(&mut self, texture: usize, uv_scale_bias: Vec4, slice: u32) {
        for slot in 0..TextureSlot::COUNT {
            if self.textures[slot] == Some(texture) {
                self.uv_scale_bias[slot] = uv_scale_bias;
                self.texture_slices[slot] = slice;
            }
        }
    }
}

/// Alpha cutoff used to remap the alpha channel of `texture` before mip
/// generation, or 0 to leave it untouched.
///
/// Only materials that use the texture as base color are considered, and
/// opaque ones are ignored. Mask materials contribute their cutoff, blend
/// materials contribute 0. Differing mask cutoffs resolve to the smallest;
/// a texture shared by mask and blend materials is not remapped.
#[must_use]
pub fn alpha_cutoff_for_texture(materials: &[Material], texture: usize) -> f32 {
    let mut cutoff: Option<f32> = None;

    for material in materials {
        if material.texture(TextureSlot::BaseColor) != Some(texture) {
            continue;
        }

        let new_cutoff = match material.alpha_mode {
            AlphaMode::Opaque => continue,
            AlphaMode::Mask => material.alpha_cutoff,
            AlphaMode::Blend => 0.0,
        };

        match cutoff {
            None => cutoff = Some(new_cutoff),
            Some(current) if current == new_cutoff => {}
            Some(current) if current == 0.0 || new_cutoff == 0.0 => {
                log::warn!(
                    "Texture {texture} is used in an alpha-cut material with threshold {} as well as in an alpha-blend material. Alpha remapping is disabled.",
                    current.max(new_cutoff)
                );
                return 0.0;
            }
            Some(current) => {
                let min = current.min(new_cutoff);
                log::warn!(
                    "Texture {texture} is used in alpha-cut materials with different thresholds ({current} and {new_cutoff}). Alpha remapping uses {min}."
                );
                cutoff = Some(min);
            }
        }
    }

    cutoff.unwrap_or(0.0).max(0.0)
}
