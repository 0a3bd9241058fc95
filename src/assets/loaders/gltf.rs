//! glTF 2.0 adapter.
//!
//! Converts a `.gltf` or `.glb` file into a [`DocumentData`] the model
//! loader can consume. Every mesh is flattened into one [`SkinnedVertex`]
//! stream; primitives are concatenated in order.

use base64::Engine as _;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3, Vec4};

use crate::animation::{InterpolationMode, TargetPath};
use crate::assets::document::{
    AnimationChannelRecord, AnimationRecord, AnimationSamplerRecord, DocumentData, ImageRecord,
    ImageSource, MaterialRecord, MeshRecord, NodeRecord, SceneRecord, SkinRecord, TextureBinding,
    TextureRecord,
};
use crate::assets::io::{AssetReader, base_dir, simplify_path};
use crate::assets::loaders::ModelLoader;
use crate::errors::{Error, Result};
use crate::model::Model;
use crate::renderer::device::RenderDevice;
use crate::resources::geometry::BoundingBox;
use crate::resources::material::{AlphaMode, TextureSlot};
use crate::resources::texture::TextureSampler;

/// Vertex layout produced for every glTF mesh.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SkinnedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub joints: [u16; 4],
    pub weights: [f32; 4],
}

impl<D: RenderDevice> ModelLoader<'_, D> {
    /// Reads the glTF file named by `file_name` through the configured
    /// asset reader and loads it.
    pub fn load_file(&self) -> Result<Model<D>> {
        let document = read_gltf(self.asset_reader(), self.file_name())?;
        self.load(&document)
    }
}

/// Reads and converts a glTF file. Buffers and images referenced by URI
/// resolve relative to the file's directory.
pub fn read_gltf(reader: &dyn AssetReader, file_name: &str) -> Result<DocumentData> {
    let bytes = reader.read_whole_file(&simplify_path(file_name))?;
    let gltf = gltf::Gltf::from_slice(&bytes)?;
    let base = base_dir(file_name);

    let buffers = gltf
        .buffers()
        .map(|buffer| match buffer.source() {
            gltf::buffer::Source::Bin => gltf
                .blob
                .clone()
                .ok_or_else(|| Error::MalformedInput("missing GLB binary chunk".to_string())),
            gltf::buffer::Source::Uri(uri) => read_uri(reader, &base, uri),
        })
        .collect::<Result<Vec<_>>>()?;

    convert_document(&gltf, &buffers)
}

fn decode_data_uri(uri: &str) -> Option<Result<Vec<u8>>> {
    let payload = uri.strip_prefix("data:")?;
    let (_, encoded) = payload.split_once(";base64,")?;
    Some(
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(Error::from),
    )
}

fn read_uri(reader: &dyn AssetReader, base: &str, uri: &str) -> Result<Vec<u8>> {
    match decode_data_uri(uri) {
        Some(decoded) => decoded,
        None => reader.read_whole_file(&simplify_path(&format!("{base}{uri}"))),
    }
}

/// Converts an already parsed document. `buffers` holds the contents of
/// every glTF buffer in order.
pub fn convert_document(document: &gltf::Document, buffers: &[Vec<u8>]) -> Result<DocumentData> {
    Ok(DocumentData {
        scenes: document
            .scenes()
            .map(|scene| SceneRecord {
                name: scene.name().map(str::to_string),
                nodes: scene.nodes().map(|n| n.index()).collect(),
            })
            .collect(),
        default_scene: document.default_scene().map(|s| s.index()),
        nodes: document.nodes().map(|n| convert_node(&n)).collect(),
        meshes: document
            .meshes()
            .map(|m| convert_mesh(&m, buffers))
            .collect::<Result<_>>()?,
        skins: document.skins().map(|s| convert_skin(&s, buffers)).collect(),
        materials: document.materials().map(|m| convert_material(&m)).collect(),
        samplers: document.samplers().map(|s| convert_sampler(&s)).collect(),
        textures: document
            .textures()
            .map(|t| TextureRecord {
                name: t.name().map(str::to_string),
                image: t.source().index(),
                sampler: t.sampler().index(),
            })
            .collect(),
        images: document
            .images()
            .map(|i| convert_image(&i, buffers))
            .collect::<Result<_>>()?,
        animations: document
            .animations()
            .map(|a| convert_animation(&a, buffers))
            .collect(),
    })
}

fn convert_node(node: &gltf::Node) -> NodeRecord {
    let mut record = NodeRecord {
        name: node.name().map(str::to_string),
        mesh: node.mesh().map(|m| m.index()),
        skin: node.skin().map(|s| s.index()),
        children: node.children().map(|c| c.index()).collect(),
        ..Default::default()
    };
    match node.transform() {
        gltf::scene::Transform::Matrix { matrix } => {
            record.matrix = Some(Mat4::from_cols_array_2d(&matrix));
        }
        gltf::scene::Transform::Decomposed {
            translation,
            rotation,
            scale,
        } => {
            record.translation = Vec3::from_array(translation);
            record.rotation = Quat::from_array(rotation);
            record.scale = Vec3::from_array(scale);
        }
    }
    record
}

fn convert_mesh(mesh: &gltf::Mesh, buffers: &[Vec<u8>]) -> Result<MeshRecord> {
    let mut vertices: Vec<SkinnedVertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    let mut bounds = BoundingBox::EMPTY;

    for primitive in mesh.primitives() {
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
        let Some(positions) = reader.read_positions() else {
            log::warn!(
                "Mesh {}: primitive {} has no positions and is skipped",
                mesh.index(),
                primitive.index()
            );
            continue;
        };

        let first = vertices.len();
        vertices.extend(positions.map(|position| SkinnedVertex {
            position,
            normal: [0.0, 0.0, 1.0],
            uv: [0.0; 2],
            joints: [0; 4],
            weights: [1.0, 0.0, 0.0, 0.0],
        }));
        let added = &mut vertices[first..];

        if let Some(normals) = reader.read_normals() {
            added.iter_mut().zip(normals).for_each(|(v, n)| v.normal = n);
        }
        if let Some(uvs) = reader.read_tex_coords(0) {
            added.iter_mut().zip(uvs.into_f32()).for_each(|(v, uv)| v.uv = uv);
        }
        if let Some(joints) = reader.read_joints(0) {
            added.iter_mut().zip(joints.into_u16()).for_each(|(v, j)| v.joints = j);
        }
        if let Some(weights) = reader.read_weights(0) {
            added
                .iter_mut()
                .zip(weights.into_f32())
                .for_each(|(v, w)| v.weights = w);
        }

        let base = first as u32;
        match reader.read_indices() {
            Some(read) => indices.extend(read.into_u32().map(|i| base + i)),
            None => indices.extend(base..vertices.len() as u32),
        }

        let b = primitive.bounding_box();
        bounds = bounds.union(&BoundingBox::new(
            Vec3::from_array(b.min),
            Vec3::from_array(b.max),
        ));
    }

    Ok(MeshRecord {
        name: mesh.name().map(str::to_string),
        bounds: bounds.is_valid().then_some(bounds),
        vertex_data: bytemuck::cast_slice(&vertices).to_vec(),
        vertex_stride: std::mem::size_of::<SkinnedVertex>() as u32,
        indices,
    })
}

fn convert_skin(skin: &gltf::Skin, buffers: &[Vec<u8>]) -> SkinRecord {
    let reader = skin.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
    SkinRecord {
        name: skin.name().map(str::to_string),
        joints: skin.joints().map(|j| j.index()).collect(),
        inverse_bind_matrices: reader
            .read_inverse_bind_matrices()
            .map(|iter| iter.map(|m| Mat4::from_cols_array_2d(&m)).collect()),
        skeleton: skin.skeleton().map(|s| s.index()),
    }
}

fn convert_material(material: &gltf::Material) -> MaterialRecord {
    let pbr = material.pbr_metallic_roughness();
    let mut textures = Vec::new();
    let mut bind = |slot, texture: Option<(usize, u32)>| {
        if let Some((texture, tex_coord)) = texture {
            textures.push(TextureBinding {
                slot,
                texture,
                tex_coord,
            });
        }
    };

    bind(
        TextureSlot::BaseColor,
        pbr.base_color_texture()
            .map(|i| (i.texture().index(), i.tex_coord())),
    );
    bind(
        TextureSlot::MetallicRoughness,
        pbr.metallic_roughness_texture()
            .map(|i| (i.texture().index(), i.tex_coord())),
    );
    bind(
        TextureSlot::Normal,
        material
            .normal_texture()
            .map(|i| (i.texture().index(), i.tex_coord())),
    );
    bind(
        TextureSlot::Occlusion,
        material
            .occlusion_texture()
            .map(|i| (i.texture().index(), i.tex_coord())),
    );
    bind(
        TextureSlot::Emissive,
        material
            .emissive_texture()
            .map(|i| (i.texture().index(), i.tex_coord())),
    );

    MaterialRecord {
        name: material.name().map(str::to_string),
        alpha_mode: match material.alpha_mode() {
            gltf::material::AlphaMode::Opaque => AlphaMode::Opaque,
            gltf::material::AlphaMode::Mask => AlphaMode::Mask,
            gltf::material::AlphaMode::Blend => AlphaMode::Blend,
        },
        alpha_cutoff: material.alpha_cutoff(),
        base_color_factor: Vec4::from_array(pbr.base_color_factor()),
        emissive_factor: Vec3::from_array(material.emissive_factor()),
        metallic_factor: pbr.metallic_factor(),
        roughness_factor: pbr.roughness_factor(),
        double_sided: material.double_sided(),
        textures,
    }
}

fn convert_wrap(mode: gltf::texture::WrappingMode) -> wgpu::AddressMode {
    match mode {
        gltf::texture::WrappingMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        gltf::texture::WrappingMode::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
        gltf::texture::WrappingMode::Repeat => wgpu::AddressMode::Repeat,
    }
}

fn convert_sampler(sampler: &gltf::texture::Sampler) -> TextureSampler {
    use gltf::texture::{MagFilter, MinFilter};

    let (min_filter, mipmap_filter) = match sampler.min_filter() {
        Some(MinFilter::Nearest | MinFilter::NearestMipmapNearest) => {
            (wgpu::FilterMode::Nearest, wgpu::MipmapFilterMode::Nearest)
        }
        Some(MinFilter::NearestMipmapLinear) => {
            (wgpu::FilterMode::Nearest, wgpu::MipmapFilterMode::Linear)
        }
        Some(MinFilter::LinearMipmapNearest) => {
            (wgpu::FilterMode::Linear, wgpu::MipmapFilterMode::Nearest)
        }
        Some(MinFilter::Linear | MinFilter::LinearMipmapLinear) | None => {
            (wgpu::FilterMode::Linear, wgpu::MipmapFilterMode::Linear)
        }
    };

    TextureSampler {
        address_mode_u: convert_wrap(sampler.wrap_s()),
        address_mode_v: convert_wrap(sampler.wrap_t()),
        mag_filter: match sampler.mag_filter() {
            Some(MagFilter::Nearest) => wgpu::FilterMode::Nearest,
            Some(MagFilter::Linear) | None => wgpu::FilterMode::Linear,
        },
        min_filter,
        mipmap_filter,
        ..Default::default()
    }
}

fn convert_image(image: &gltf::Image, buffers: &[Vec<u8>]) -> Result<ImageRecord> {
    let source = match image.source() {
        gltf::image::Source::Uri { uri, .. } => match decode_data_uri(uri) {
            Some(decoded) => ImageSource::Embedded(decoded?),
            None => ImageSource::Uri(uri.to_string()),
        },
        gltf::image::Source::View { view, .. } => {
            let buffer = buffers
                .get(view.buffer().index())
                .ok_or_else(|| Error::out_of_bounds("buffer of image view", view.buffer().index()))?;
            let bytes = buffer
                .get(view.offset()..view.offset() + view.length())
                .ok_or_else(|| {
                    Error::MalformedInput(format!(
                        "image {} view exceeds its buffer",
                        image.index()
                    ))
                })?;
            ImageSource::Embedded(bytes.to_vec())
        }
    };
    Ok(ImageRecord {
        name: image.name().map(str::to_string),
        source,
    })
}

fn convert_animation(animation: &gltf::Animation, buffers: &[Vec<u8>]) -> AnimationRecord {
    use gltf::animation::util::ReadOutputs;

    let mut samplers: Vec<AnimationSamplerRecord> = animation
        .samplers()
        .map(|s| AnimationSamplerRecord {
            inputs: Vec::new(),
            outputs: Vec::new(),
            interpolation: match s.interpolation() {
                gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                gltf::animation::Interpolation::Step => InterpolationMode::Step,
                gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
            },
        })
        .collect();
    let mut channels = Vec::new();

    // Keyframes are read through the channels, which know the output type.
    for channel in animation.channels() {
        let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
        let sampler = channel.sampler().index();

        let (path, outputs): (TargetPath, Vec<Vec4>) = match reader.read_outputs() {
            Some(ReadOutputs::Translations(iter)) => (
                TargetPath::Translation,
                iter.map(|t| Vec3::from_array(t).extend(0.0)).collect(),
            ),
            Some(ReadOutputs::Rotations(iter)) => (
                TargetPath::Rotation,
                iter.into_f32().map(Vec4::from_array).collect(),
            ),
            Some(ReadOutputs::Scales(iter)) => (
                TargetPath::Scale,
                iter.map(|s| Vec3::from_array(s).extend(0.0)).collect(),
            ),
            Some(ReadOutputs::MorphTargetWeights(iter)) => (
                TargetPath::Weights,
                iter.into_f32().map(|w| Vec4::new(w, 0.0, 0.0, 0.0)).collect(),
            ),
            None => {
                log::warn!(
                    "Animation {}: channel for sampler {sampler} has no readable output",
                    animation.index()
                );
                continue;
            }
        };

        if let Some(record) = samplers.get_mut(sampler)
            && record.inputs.is_empty()
        {
            record.inputs = reader.read_inputs().map(Iterator::collect).unwrap_or_default();
            record.outputs = outputs;
        }

        channels.push(AnimationChannelRecord {
            sampler,
            target_node: Some(channel.target().node().index()),
            path,
        });
    }

    AnimationRecord {
        name: animation.name().map(str::to_string),
        samplers,
        channels,
    }
}
