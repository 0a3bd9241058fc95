//! Builds a [`Model`] from a [`SceneDocument`].
//!
//! Loading is synchronous and may run on many threads at once against the
//! same texture cache or atlas. The order is fixed: materials, samplers,
//! images, textures, nodes and meshes, skins, animations, buffers. Any
//! structural error aborts the load and no partial model is returned.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::animation::{InterpolationMode, TargetPath};
use crate::assets::atlas::{AtlasAllocator, AtlasSuballocation};
use crate::assets::cache::{CacheLookup, TextureCache};
use crate::assets::decoder::{DecodedImage, ImageDecoder, PrebuiltTexture};
use crate::assets::document::{ImageSource, NodeRecord, SceneDocument, SkinRecord};
use crate::assets::io::{AssetReader, base_dir, simplify_path};
use crate::assets::settings::ModelCreateInfo;
use crate::errors::{Error, Result};
use crate::model::{Model, ModelBuffer, TextureInfo};
use crate::renderer::device::{BufferDesc, RenderDevice, SubresourceData, TextureDesc};
use crate::renderer::gpu_buffer::{BufferKind, GpuBuffer};
use crate::renderer::gpu_texture::{GpuTexture, StagingTexture, TextureUpload};
use crate::resources::geometry::Mesh;
use crate::resources::image::{ImageData, checkerboard, prepare_texture_levels};
use crate::resources::material::{Material, alpha_cutoff_for_texture};
use crate::resources::texture::{TextureSampler, full_mip_count};
use crate::scene::NodeGraph;

const PIXEL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// A shared resource found during the image pass, held until the texture
/// pass so it cannot be evicted in between.
enum HeldResource<D: RenderDevice> {
    Texture(Arc<GpuTexture<D>>),
    Allocation(Arc<AtlasSuballocation<D>>),
}

enum ImageEntry<D: RenderDevice> {
    Cached {
        width: u32,
        height: u32,
        _held: HeldResource<D>,
    },
    Decoded(DecodedImage),
    Failed(String),
}

struct LoadedImage<D: RenderDevice> {
    /// Canonical path; empty for embedded images, which are never shared.
    key: String,
    source: ImageSource,
    entry: ImageEntry<D>,
}

struct MeshData {
    meshes: Vec<Mesh>,
    vertices: Vec<u8>,
    indices: Vec<u32>,
}

pub struct ModelLoader<'a, D: RenderDevice> {
    device: &'a D,
    info: &'a ModelCreateInfo<D>,
    reader: Arc<dyn AssetReader>,
    decoder: Arc<dyn ImageDecoder>,
    base_dir: String,
}

impl<'a, D: RenderDevice> ModelLoader<'a, D> {
    pub fn new(device: &'a D, info: &'a ModelCreateInfo<D>) -> Self {
        Self {
            device,
            info,
            reader: info.reader(),
            decoder: info.decoder(),
            base_dir: base_dir(&info.file_name),
        }
    }

    #[cfg(feature = "gltf")]
    pub(crate) fn file_name(&self) -> &str {
        &self.info.file_name
    }

    #[cfg(feature = "gltf")]
    pub(crate) fn asset_reader(&self) -> &dyn AssetReader {
        &*self.reader
    }

    pub fn load(&self, doc: &dyn SceneDocument) -> Result<Model<D>> {
        if !matches!(
            self.info.index_format,
            wgpu::IndexFormat::Uint16 | wgpu::IndexFormat::Uint32
        ) {
            return Err(Error::InvalidConfig(format!(
                "unsupported index format {:?}",
                self.info.index_format
            )));
        }
        let cache = self.info.effective_texture_cache();
        let atlas = self.info.atlas_allocator.as_deref();

        let mut materials = self.load_materials(doc)?;
        let samplers = self.load_samplers(doc)?;
        let images = self.load_images(doc, cache, atlas)?;
        let textures = self.load_textures(doc, &images, &samplers, &materials, cache, atlas)?;
        drop(images);

        for (index, info) in textures.iter().enumerate() {
            if let Some(allocation) = &info.atlas_allocation {
                let scale_bias = allocation.uv_scale_bias();
                for material in &mut materials {
                    material.set_atlas_placement(index, scale_bias, allocation.slice());
                }
            }
        }

        let mut graph = self.load_nodes(doc)?;
        let mesh_data = self.load_meshes(doc)?;
        graph.set_meshes(mesh_data.meshes)?;
        self.load_skins(doc, &mut graph)?;
        self.load_animations(doc, &mut graph)?;
        let (vertex_buffer, index_buffer) =
            self.create_buffers(mesh_data.vertices, &mesh_data.indices)?;

        log::debug!(
            "Loaded '{}': {} nodes, {} textures, {} animations",
            self.info.file_name,
            graph.node_count(),
            textures.len(),
            graph.animations().len()
        );

        Ok(Model {
            graph,
            materials,
            samplers,
            textures,
            vertex_buffer,
            index_buffer,
            index_format: self.info.index_format,
            gpu_data_initialized: AtomicBool::new(false),
        })
    }

    // ========================================================================
    // Materials & samplers
    // ========================================================================

    fn load_materials(&self, doc: &dyn SceneDocument) -> Result<Vec<Material>> {
        let texture_count = doc.texture_count();
        let mut materials = Vec::with_capacity(doc.material_count().max(1));

        for index in 0..doc.material_count() {
            let record = doc
                .material(index)
                .ok_or_else(|| Error::out_of_bounds("material", index))?;
            for binding in &record.textures {
                if binding.texture >= texture_count {
                    return Err(Error::out_of_bounds(
                        format!("texture of material {index}"),
                        binding.texture,
                    ));
                }
            }

            let mut material = Material::from_record(index, &record);
            if let Some(callback) = &self.info.material_load_callback {
                callback(index, &mut material);
            }
            materials.push(material);
        }

        if materials.is_empty() {
            materials.push(Material::default());
        }
        Ok(materials)
    }

    fn load_samplers(&self, doc: &dyn SceneDocument) -> Result<Vec<Arc<D::Sampler>>> {
        (0..doc.sampler_count())
            .map(|index| {
                let desc = doc
                    .sampler(index)
                    .ok_or_else(|| Error::out_of_bounds("sampler", index))?;
                Ok(Arc::new(self.device.create_sampler(&desc)?))
            })
            .collect()
    }

    // ========================================================================
    // Images
    // ========================================================================

    fn image_key(&self, source: &ImageSource) -> String {
        match source {
            ImageSource::Uri(uri) => simplify_path(&format!("{}{uri}", self.base_dir)),
            ImageSource::Embedded(_) => String::new(),
        }
    }

    fn read_image(&self, source: &ImageSource, key: &str) -> Result<DecodedImage> {
        match source {
            ImageSource::Uri(_) => {
                let bytes = self.reader.read_whole_file(key)?;
                self.decoder.decode(&bytes)
            }
            ImageSource::Embedded(bytes) => self.decoder.decode(bytes),
        }
    }

    /// First pass: find images that are already shared, decode the rest.
    fn load_images(
        &self,
        doc: &dyn SceneDocument,
        cache: Option<&Arc<TextureCache<D>>>,
        atlas: Option<&dyn AtlasAllocator<D>>,
    ) -> Result<Vec<LoadedImage<D>>> {
        let mut images = Vec::with_capacity(doc.image_count());

        for index in 0..doc.image_count() {
            let record = doc
                .image(index)
                .ok_or_else(|| Error::out_of_bounds("image", index))?;
            let key = self.image_key(&record.source);

            let held = if key.is_empty() {
                None
            } else if let Some(atlas) = atlas {
                atlas.find_allocation(&key).map(HeldResource::Allocation)
            } else {
                cache.and_then(|c| c.get(&key)).map(HeldResource::Texture)
            };

            let entry = match held {
                Some(held) => {
                    let (width, height) = match &held {
                        HeldResource::Texture(t) => (t.desc().width, t.desc().height),
                        HeldResource::Allocation(a) => (a.size().x, a.size().y),
                    };
                    log::debug!("Image '{key}' is already loaded ({width}x{height})");
                    ImageEntry::Cached {
                        width,
                        height,
                        _held: held,
                    }
                }
                None => match self.read_image(&record.source, &key) {
                    Ok(decoded) => ImageEntry::Decoded(decoded),
                    Err(err) => {
                        log::debug!("Image {index} could not be loaded: {err}");
                        ImageEntry::Failed(err.to_string())
                    }
                },
            };

            images.push(LoadedImage {
                key,
                source: record.source,
                entry,
            });
        }

        Ok(images)
    }

    // ========================================================================
    // Textures
    // ========================================================================

    fn load_textures(
        &self,
        doc: &dyn SceneDocument,
        images: &[LoadedImage<D>],
        samplers: &[Arc<D::Sampler>],
        materials: &[Material],
        cache: Option<&Arc<TextureCache<D>>>,
        atlas: Option<&dyn AtlasAllocator<D>>,
    ) -> Result<Vec<TextureInfo<D>>> {
        let mut default_sampler: Option<Arc<D::Sampler>> = None;
        let mut textures = Vec::with_capacity(doc.texture_count());

        for index in 0..doc.texture_count() {
            let record = doc
                .texture(index)
                .ok_or_else(|| Error::out_of_bounds("texture", index))?;
            let image = images.get(record.image).ok_or_else(|| {
                Error::out_of_bounds(format!("image of texture {index}"), record.image)
            })?;

            let sampler = match record.sampler {
                Some(s) => Arc::clone(samplers.get(s).ok_or_else(|| {
                    Error::out_of_bounds(format!("sampler of texture {index}"), s)
                })?),
                None => match &default_sampler {
                    Some(s) => Arc::clone(s),
                    None => {
                        let s = Arc::new(self.device.create_sampler(&TextureSampler::default())?);
                        default_sampler = Some(Arc::clone(&s));
                        s
                    }
                },
            };

            let info = self.add_texture(index, image, sampler, materials, cache, atlas)?;
            textures.push(info);
        }

        Ok(textures)
    }

    /// Second pass for one texture: reuse the shared resource found in the
    /// first pass, or create and publish a new one.
    fn add_texture(
        &self,
        index: usize,
        image: &LoadedImage<D>,
        sampler: Arc<D::Sampler>,
        materials: &[Material],
        cache: Option<&Arc<TextureCache<D>>>,
        atlas: Option<&dyn AtlasAllocator<D>>,
    ) -> Result<TextureInfo<D>> {
        let key = image.key.as_str();

        if !key.is_empty() {
            if let Some(atlas) = atlas {
                if let Some(allocation) = atlas.find_allocation(key) {
                    return Ok(TextureInfo {
                        texture: None,
                        atlas_allocation: Some(allocation),
                    });
                }
            } else if let Some(cache) = cache
                && let CacheLookup::Hit(texture) = cache.lookup(key)
            {
                return Ok(TextureInfo {
                    texture: Some(texture),
                    atlas_allocation: None,
                });
            }

            if let ImageEntry::Cached { width, height, .. } = &image.entry {
                log::error!(
                    "Texture {index}: '{key}' ({width}x{height}) was found in the cache while reading images but is missing now; loading it again"
                );
            }
        }

        let refetched;
        let decoded = match &image.entry {
            ImageEntry::Decoded(decoded) => Ok(decoded),
            ImageEntry::Failed(reason) => Err(reason.clone()),
            ImageEntry::Cached { .. } => {
                refetched = self.read_image(&image.source, key);
                refetched.as_ref().map_err(ToString::to_string)
            }
        };

        let alpha_cutoff = alpha_cutoff_for_texture(materials, index);

        let info = match decoded {
            Ok(DecodedImage::Pixels(pixels)) => match atlas {
                Some(atlas) => self
                    .allocate_pixels(atlas, key, pixels, alpha_cutoff)
                    .or_else(|err| {
                        log::warn!(
                            "Texture {index}: atlas allocation failed ({err}); using a standalone texture"
                        );
                        self.standalone_from_pixels(index, pixels, alpha_cutoff, sampler.clone())
                    })?,
                None => self.standalone_from_pixels(index, pixels, alpha_cutoff, sampler)?,
            },
            Ok(DecodedImage::Prebuilt(prebuilt)) => match atlas {
                Some(atlas) => self.allocate_prebuilt(atlas, key, prebuilt).or_else(|err| {
                    log::warn!(
                        "Texture {index}: atlas allocation failed ({err}); using a standalone texture"
                    );
                    self.standalone_from_prebuilt(index, prebuilt, sampler.clone())
                })?,
                None => self.standalone_from_prebuilt(index, prebuilt, sampler)?,
            },
            Err(reason) => {
                if atlas.is_some() {
                    log::warn!("Texture {index}: failed to load image ({reason})");
                    return Ok(TextureInfo::default());
                }
                log::warn!("Texture {index}: failed to load image ({reason}); using a stub texture");
                return self.stub_texture(index, sampler);
            }
        };

        Ok(self.publish(key, info, cache))
    }

    fn publish(
        &self,
        key: &str,
        info: TextureInfo<D>,
        cache: Option<&Arc<TextureCache<D>>>,
    ) -> TextureInfo<D> {
        match (&info.texture, cache) {
            (Some(texture), Some(cache)) if !key.is_empty() => TextureInfo {
                texture: Some(cache.publish(key, Arc::clone(texture))),
                atlas_allocation: None,
            },
            _ => info,
        }
    }

    fn allocate_pixels(
        &self,
        atlas: &dyn AtlasAllocator<D>,
        key: &str,
        pixels: &ImageData,
        alpha_cutoff: f32,
    ) -> Result<TextureInfo<D>> {
        let atlas_desc = atlas.atlas_desc(PIXEL_FORMAT);
        let levels = prepare_texture_levels(pixels, alpha_cutoff, atlas_desc.mip_level_count)?;
        let allocation = atlas.allocate_texture_space(
            self.device,
            PIXEL_FORMAT,
            pixels.width,
            pixels.height,
            key,
            TextureUpload::from_levels(levels),
        )?;
        Ok(TextureInfo {
            texture: None,
            atlas_allocation: Some(allocation),
        })
    }

    fn allocate_prebuilt(
        &self,
        atlas: &dyn AtlasAllocator<D>,
        key: &str,
        prebuilt: &PrebuiltTexture,
    ) -> Result<TextureInfo<D>> {
        let desc = TextureDesc {
            label: format!("Staging texture '{key}'"),
            width: prebuilt.width,
            height: prebuilt.height,
            array_layers: 1,
            mip_level_count: prebuilt.levels.len().max(1) as u32,
            format: prebuilt.format,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::COPY_DST,
        };
        let raw = self.create_with_levels(&desc, prebuilt)?;
        let allocation = atlas.allocate_texture_space(
            self.device,
            prebuilt.format,
            prebuilt.width,
            prebuilt.height,
            key,
            TextureUpload::from_staging(StagingTexture { raw, desc }),
        )?;
        Ok(TextureInfo {
            texture: None,
            atlas_allocation: Some(allocation),
        })
    }

    fn standalone_from_pixels(
        &self,
        index: usize,
        pixels: &ImageData,
        alpha_cutoff: f32,
        sampler: Arc<D::Sampler>,
    ) -> Result<TextureInfo<D>> {
        // Only level 0 is prepared; the rest is generated on the GPU.
        let levels = match prepare_texture_levels(pixels, alpha_cutoff, 1) {
            Ok(levels) => levels,
            Err(err) => {
                log::warn!("Texture {index}: {err}; using a stub texture");
                return self.stub_texture(index, sampler);
            }
        };

        let desc = TextureDesc {
            label: format!("Model texture {index}"),
            width: pixels.width,
            height: pixels.height,
            array_layers: 1,
            mip_level_count: full_mip_count(pixels.width, pixels.height),
            format: PIXEL_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
        };
        let raw = self.device.create_texture(&desc, None)?;

        Ok(TextureInfo {
            texture: Some(Arc::new(GpuTexture::new(
                raw,
                desc,
                Some(sampler),
                TextureUpload::from_levels(levels),
            ))),
            atlas_allocation: None,
        })
    }

    fn standalone_from_prebuilt(
        &self,
        index: usize,
        prebuilt: &PrebuiltTexture,
        sampler: Arc<D::Sampler>,
    ) -> Result<TextureInfo<D>> {
        let desc = TextureDesc {
            label: format!("Model texture {index}"),
            width: prebuilt.width,
            height: prebuilt.height,
            array_layers: 1,
            mip_level_count: prebuilt.levels.len().max(1) as u32,
            format: prebuilt.format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        };
        let raw = self.create_with_levels(&desc, prebuilt)?;

        Ok(TextureInfo {
            texture: Some(Arc::new(GpuTexture::new(
                raw,
                desc,
                Some(sampler),
                TextureUpload::transition_only(),
            ))),
            atlas_allocation: None,
        })
    }

    fn create_with_levels(&self, desc: &TextureDesc, prebuilt: &PrebuiltTexture) -> Result<D::Texture> {
        let subresources: Vec<SubresourceData<'_>> = prebuilt
            .levels
            .iter()
            .map(|level| SubresourceData {
                data: &level.data,
                stride: level.stride,
            })
            .collect();
        self.device.create_texture(desc, Some(&subresources))
    }

    /// Checkerboard stand-in for an image that could not be loaded. Never
    /// published to the cache.
    fn stub_texture(&self, index: usize, sampler: Arc<D::Sampler>) -> Result<TextureInfo<D>> {
        let pixels = checkerboard();
        let levels = prepare_texture_levels(&pixels, 0.0, 1)?;
        let desc = TextureDesc {
            label: format!("Stub texture {index}"),
            width: pixels.width,
            height: pixels.height,
            array_layers: 1,
            mip_level_count: full_mip_count(pixels.width, pixels.height),
            format: PIXEL_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
        };
        let raw = self.device.create_texture(&desc, None)?;
        Ok(TextureInfo {
            texture: Some(Arc::new(GpuTexture::new(
                raw,
                desc,
                Some(sampler),
                TextureUpload::from_levels(levels),
            ))),
            atlas_allocation: None,
        })
    }

    // ========================================================================
    // Nodes, meshes, skins, animations
    // ========================================================================

    fn select_roots(&self, doc: &dyn SceneDocument, records: &[NodeRecord]) -> Vec<usize> {
        let scenes = doc.scenes();
        if scenes.is_empty() {
            return NodeGraph::parentless_roots(records);
        }

        let default_scene = doc
            .default_scene()
            .filter(|&s| s < scenes.len())
            .unwrap_or(0);
        let scene = match self.info.scene_id {
            Some(id) if id < scenes.len() => id,
            Some(id) => {
                log::error!(
                    "Scene {id} does not exist in '{}' ({} scenes); loading the default scene",
                    self.info.file_name,
                    scenes.len()
                );
                default_scene
            }
            None => default_scene,
        };
        scenes[scene].nodes.clone()
    }

    fn load_nodes(&self, doc: &dyn SceneDocument) -> Result<NodeGraph> {
        let records = (0..doc.node_count())
            .map(|i| doc.node(i).ok_or_else(|| Error::out_of_bounds("node", i)))
            .collect::<Result<Vec<_>>>()?;
        let roots = self.select_roots(doc, &records);
        NodeGraph::from_records(&records, &roots)
    }

    fn load_meshes(&self, doc: &dyn SceneDocument) -> Result<MeshData> {
        let mut data = MeshData {
            meshes: Vec::with_capacity(doc.mesh_count()),
            vertices: Vec::new(),
            indices: Vec::new(),
        };
        let mut stride: Option<u32> = None;

        for index in 0..doc.mesh_count() {
            let record = doc
                .mesh(index)
                .ok_or_else(|| Error::out_of_bounds("mesh", index))?;

            let vertex_count = if record.vertex_data.is_empty() {
                0
            } else {
                if record.vertex_stride == 0
                    || record.vertex_data.len() % record.vertex_stride as usize != 0
                {
                    return Err(Error::MalformedInput(format!(
                        "mesh {index}: {} vertex bytes with stride {}",
                        record.vertex_data.len(),
                        record.vertex_stride
                    )));
                }
                match stride {
                    Some(s) if s != record.vertex_stride => {
                        return Err(Error::MalformedInput(format!(
                            "mesh {index}: vertex stride {} differs from {s}",
                            record.vertex_stride
                        )));
                    }
                    _ => stride = Some(record.vertex_stride),
                }
                (record.vertex_data.len() / record.vertex_stride as usize) as u32
            };

            let first_vertex = stride.map_or(0, |s| (data.vertices.len() / s as usize) as u32);
            let first_index = data.indices.len() as u32;

            for &i in &record.indices {
                if i >= vertex_count {
                    return Err(Error::out_of_bounds(
                        format!("vertex index of mesh {index}"),
                        i as usize,
                    ));
                }
                data.indices.push(first_vertex + i);
            }
            data.vertices.extend_from_slice(&record.vertex_data);

            data.meshes.push(Mesh {
                name: record.name,
                bounds: record.bounds,
                first_index,
                index_count: record.indices.len() as u32,
                first_vertex,
                vertex_count,
            });
        }

        Ok(data)
    }

    fn load_skins(&self, doc: &dyn SceneDocument, graph: &mut NodeGraph) -> Result<()> {
        let records = (0..doc.skin_count())
            .map(|i| doc.skin(i).ok_or_else(|| Error::out_of_bounds("skin", i)))
            .collect::<Result<Vec<SkinRecord>>>()?;
        graph.set_skins(&records)
    }

    fn load_animations(&self, doc: &dyn SceneDocument, graph: &mut NodeGraph) -> Result<()> {
        for index in 0..doc.animation_count() {
            let record = doc
                .animation(index)
                .ok_or_else(|| Error::out_of_bounds("animation", index))?;

            for (s, sampler) in record.samplers.iter().enumerate() {
                if sampler.interpolation == InterpolationMode::CubicSpline {
                    log::warn!(
                        "Animation {index}: sampler {s} uses cubic spline interpolation, which is not supported; its channels will not play"
                    );
                }
            }
            if record.channels.iter().any(|c| c.path == TargetPath::Weights) {
                log::debug!("Animation {index}: morph weight channels are ignored");
            }

            graph.add_animation(index, record)?;
        }
        Ok(())
    }

    // ========================================================================
    // Buffers
    // ========================================================================

    fn create_buffer(&self, kind: BufferKind, label: &str, mut bytes: Vec<u8>) -> Result<ModelBuffer<D>> {
        bytes.resize(bytes.len().next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT as usize), 0);
        if let Some(allocator) = &self.info.buffer_allocator {
            let allocation = allocator.allocate_buffer_space(self.device, kind, bytes)?;
            log::trace!(
                "{label} of '{}' pooled at offset {}",
                self.info.file_name,
                allocation.offset()
            );
            return Ok(ModelBuffer::Pooled(allocation));
        }

        let desc = BufferDesc {
            label: format!("{label} ({})", self.info.file_name),
            size: bytes.len() as u64,
            usage: kind.usage(),
        };
        let raw = self.device.create_buffer(&desc)?;
        Ok(ModelBuffer::Standalone(GpuBuffer::new(raw, desc, kind, bytes)))
    }

    fn create_buffers(
        &self,
        vertices: Vec<u8>,
        indices: &[u32],
    ) -> Result<(Option<ModelBuffer<D>>, Option<ModelBuffer<D>>)> {
        let vertex_buffer = if vertices.is_empty() {
            None
        } else {
            Some(self.create_buffer(BufferKind::Vertex, "Vertex buffer", vertices)?)
        };

        let index_buffer = if indices.is_empty() {
            None
        } else {
            let bytes = match self.info.index_format {
                wgpu::IndexFormat::Uint16 => {
                    let narrow = indices
                        .iter()
                        .map(|&i| {
                            u16::try_from(i).map_err(|_| {
                                Error::MalformedInput(format!(
                                    "vertex index {i} does not fit in a 16-bit index buffer"
                                ))
                            })
                        })
                        .collect::<Result<Vec<u16>>>()?;
                    bytemuck::cast_slice(&narrow).to_vec()
                }
                wgpu::IndexFormat::Uint32 => bytemuck::cast_slice(indices).to_vec(),
            };
            Some(self.create_buffer(BufferKind::Index, "Index buffer", bytes)?)
        };

        Ok((vertex_buffer, index_buffer))
    }
}
