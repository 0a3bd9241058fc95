//! Shared fixtures: a recording device, an in-memory file system and small
//! scene documents.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use glam::{Quat, Vec3};
use parking_lot::Mutex;
use scene_runtime::assets::document::{
    DocumentData, ImageRecord, ImageSource, MaterialRecord, MeshRecord, NodeRecord, SceneRecord,
    TextureBinding, TextureRecord,
};
use scene_runtime::assets::io::AssetReader;
use scene_runtime::errors::{Error, Result};
use scene_runtime::renderer::device::{
    BufferDesc, DeviceContext, RenderDevice, ResourceState, StateTransition, SubresourceData,
    TextureCopy, TextureDesc, TextureRegion, TransitionTarget,
};
use scene_runtime::resources::geometry::BoundingBox;
use scene_runtime::resources::material::{AlphaMode, TextureSlot};
use scene_runtime::resources::texture::TextureSampler;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Mock device
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    pub id: usize,
    pub desc: TextureDesc,
    pub initial_levels: usize,
}

#[derive(Debug)]
pub struct MockBuffer {
    pub id: usize,
    pub desc: BufferDesc,
}

#[derive(Debug)]
pub struct MockSampler {
    pub desc: TextureSampler,
}

#[derive(Debug, Default)]
pub struct MockDevice {
    next_id: AtomicUsize,
    pub textures_created: AtomicUsize,
    pub buffers_created: AtomicUsize,
    pub samplers_created: AtomicUsize,
}

impl MockDevice {
    pub fn texture_count(&self) -> usize {
        self.textures_created.load(Ordering::SeqCst)
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers_created.load(Ordering::SeqCst)
    }
}

impl RenderDevice for MockDevice {
    type Texture = MockTexture;
    type Buffer = MockBuffer;
    type Sampler = MockSampler;

    fn create_texture(
        &self,
        desc: &TextureDesc,
        initial_data: Option<&[SubresourceData<'_>]>,
    ) -> Result<MockTexture> {
        if desc.width == 0 || desc.height == 0 {
            return Err(Error::Device(format!("empty texture '{}'", desc.label)));
        }
        self.textures_created.fetch_add(1, Ordering::SeqCst);
        Ok(MockTexture {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            desc: desc.clone(),
            initial_levels: initial_data.map_or(0, <[_]>::len),
        })
    }

    fn create_buffer(&self, desc: &BufferDesc) -> Result<MockBuffer> {
        self.buffers_created.fetch_add(1, Ordering::SeqCst);
        Ok(MockBuffer {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            desc: desc.clone(),
        })
    }

    fn create_sampler(&self, desc: &TextureSampler) -> Result<MockSampler> {
        self.samplers_created.fetch_add(1, Ordering::SeqCst);
        Ok(MockSampler { desc: *desc })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    UpdateTexture {
        texture: usize,
        mip: u32,
        slice: u32,
        region: TextureRegion,
        bytes: usize,
    },
    UpdateBuffer {
        buffer: usize,
        offset: u64,
        bytes: Vec<u8>,
    },
    CopyTexture {
        src: usize,
        dst: usize,
        copy: TextureCopy,
    },
    GenerateMips {
        texture: usize,
    },
    Transitions(Vec<(usize, ResourceState)>),
}

/// Records every command it receives.
#[derive(Debug, Default)]
pub struct RecordingContext {
    pub commands: Vec<Command>,
}

impl RecordingContext {
    pub fn texture_updates(&self) -> Vec<&Command> {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::UpdateTexture { .. }))
            .collect()
    }

    pub fn mip_generations(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::GenerateMips { .. }))
            .count()
    }

    /// `(buffer, offset, bytes)` of every buffer update.
    pub fn buffer_updates(&self) -> Vec<(usize, u64, &[u8])> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::UpdateBuffer {
                    buffer,
                    offset,
                    bytes,
                } => Some((*buffer, *offset, bytes.as_slice())),
                _ => None,
            })
            .collect()
    }

    pub fn transition_batches(&self) -> Vec<&Vec<(usize, ResourceState)>> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Transitions(t) => Some(t),
                _ => None,
            })
            .collect()
    }
}

impl DeviceContext<MockDevice> for RecordingContext {
    fn update_texture(
        &mut self,
        texture: &MockTexture,
        mip_level: u32,
        slice: u32,
        region: TextureRegion,
        data: SubresourceData<'_>,
    ) {
        self.commands.push(Command::UpdateTexture {
            texture: texture.id,
            mip: mip_level,
            slice,
            region,
            bytes: data.data.len(),
        });
    }

    fn update_buffer(&mut self, buffer: &MockBuffer, offset: u64, data: &[u8]) {
        self.commands.push(Command::UpdateBuffer {
            buffer: buffer.id,
            offset,
            bytes: data.to_vec(),
        });
    }

    fn copy_texture(&mut self, src: &MockTexture, dst: &MockTexture, copy: TextureCopy) {
        self.commands.push(Command::CopyTexture {
            src: src.id,
            dst: dst.id,
            copy,
        });
    }

    fn generate_mips(&mut self, texture: &MockTexture) {
        self.commands.push(Command::GenerateMips {
            texture: texture.id,
        });
    }

    fn transition_resource_states(&mut self, transitions: &[StateTransition<'_, MockDevice>]) {
        self.commands.push(Command::Transitions(
            transitions
                .iter()
                .map(|t| {
                    let id = match t.resource {
                        TransitionTarget::Texture(texture) => texture.id,
                        TransitionTarget::Buffer(buffer) => buffer.id,
                    };
                    (id, t.new_state)
                })
                .collect(),
        ));
    }
}

// ============================================================================
// In-memory files
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryReader {
    files: HashMap<String, Vec<u8>>,
    pub reads: Mutex<Vec<String>>,
}

impl MemoryReader {
    pub fn with_file(mut self, path: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(path.to_string(), bytes);
        self
    }

    pub fn read_count(&self, path: &str) -> usize {
        self.reads.lock().iter().filter(|p| *p == path).count()
    }
}

impl AssetReader for MemoryReader {
    fn file_exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn read_whole_file(&self, path: &str) -> Result<Vec<u8>> {
        self.reads.lock().push(path.to_string());
        self.files.get(path).cloned().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                path.to_string(),
            ))
        })
    }
}

pub fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png)
        .expect("png encoding");
    bytes.into_inner()
}

// ============================================================================
// Documents
// ============================================================================

pub fn translated_node(translation: Vec3, children: Vec<usize>) -> NodeRecord {
    NodeRecord {
        translation,
        children,
        ..Default::default()
    }
}

/// Root -> child -> grandchild, each translated by +1 on x.
pub fn chain_nodes() -> Vec<NodeRecord> {
    vec![
        translated_node(Vec3::X, vec![1]),
        translated_node(Vec3::X, vec![2]),
        translated_node(Vec3::X, vec![]),
    ]
}

/// A unit triangle with 12-byte position vertices.
pub fn triangle_mesh() -> MeshRecord {
    let positions: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
    MeshRecord {
        name: Some("triangle".to_string()),
        bounds: Some(BoundingBox::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0))),
        vertex_data: bytemuck::cast_slice(&positions).to_vec(),
        vertex_stride: 12,
        indices: vec![0, 1, 2],
    }
}

pub fn base_color_material(texture: usize, alpha_mode: AlphaMode, cutoff: Option<f32>) -> MaterialRecord {
    MaterialRecord {
        alpha_mode,
        alpha_cutoff: cutoff,
        textures: vec![TextureBinding {
            slot: TextureSlot::BaseColor,
            texture,
            tex_coord: 0,
        }],
        ..Default::default()
    }
}

/// One node with the triangle mesh and one textured material per URI.
pub fn textured_document(uris: &[&str]) -> DocumentData {
    DocumentData {
        scenes: vec![SceneRecord {
            name: None,
            nodes: vec![0],
        }],
        default_scene: Some(0),
        nodes: vec![NodeRecord {
            mesh: Some(0),
            rotation: Quat::IDENTITY,
            ..Default::default()
        }],
        meshes: vec![triangle_mesh()],
        materials: (0..uris.len())
            .map(|i| base_color_material(i, AlphaMode::Opaque, None))
            .collect(),
        textures: (0..uris.len())
            .map(|i| TextureRecord {
                name: None,
                image: i,
                sampler: None,
            })
            .collect(),
        images: uris
            .iter()
            .map(|uri| ImageRecord {
                name: None,
                source: ImageSource::Uri((*uri).to_string()),
            })
            .collect(),
        ..Default::default()
    }
}
