//! Vertex and index buffer sub-allocation.
//!
//! With a [`BufferAllocator`] configured, a model's vertex and index data
//! are placed at offsets inside shared pool buffers instead of getting a
//! buffer each. Pool buffers are owned by the allocator, which is also
//! responsible for their resource states.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::errors::{Error, Result};
use crate::renderer::device::{BufferDesc, RenderDevice};
use crate::renderer::gpu_buffer::BufferKind;
use crate::renderer::pending::PendingUpload;

/// One shared buffer that sub-allocations point into.
pub struct BufferPage<D: RenderDevice> {
    buffer: D::Buffer,
    desc: BufferDesc,
}

impl<D: RenderDevice> BufferPage<D> {
    #[inline]
    pub fn buffer(&self) -> &D::Buffer {
        &self.buffer
    }

    #[inline]
    pub fn desc(&self) -> &BufferDesc {
        &self.desc
    }
}

/// A byte range of a [`BufferPage`] and the data it still has to receive.
pub struct BufferSuballocation<D: RenderDevice> {
    page: Arc<BufferPage<D>>,
    kind: BufferKind,
    offset: u64,
    size: u64,
    pending: PendingUpload<Vec<u8>>,
}

impl<D: RenderDevice> BufferSuballocation<D> {
    /// Allocations are normally produced by a [`BufferAllocator`]; this is
    /// the constructor custom allocators use.
    #[must_use]
    pub fn new(page: Arc<BufferPage<D>>, kind: BufferKind, offset: u64, data: Vec<u8>) -> Self {
        Self {
            page,
            kind,
            offset,
            size: data.len() as u64,
            pending: PendingUpload::new(data),
        }
    }

    #[inline]
    pub fn page(&self) -> &Arc<BufferPage<D>> {
        &self.page
    }

    #[inline]
    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    /// Byte offset of the range inside the page buffer.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn pending(&self) -> &PendingUpload<Vec<u8>> {
        &self.pending
    }
}

impl<D: RenderDevice> std::fmt::Debug for BufferPage<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferPage")
            .field("desc", &self.desc)
            .finish_non_exhaustive()
    }
}

impl<D: RenderDevice> std::fmt::Debug for BufferSuballocation<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferSuballocation")
            .field("kind", &self.kind)
            .field("offset", &self.offset)
            .field("size", &self.size)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

/// Places vertex and index data into shared buffers.
///
/// Shared by all loader threads.
pub trait BufferAllocator<D: RenderDevice>: Send + Sync {
    /// Reserves `data.len()` bytes for a buffer of `kind`. The length is a
    /// multiple of [`wgpu::COPY_BUFFER_ALIGNMENT`].
    fn allocate_buffer_space(
        &self,
        device: &D,
        kind: BufferKind,
        data: Vec<u8>,
    ) -> Result<Arc<BufferSuballocation<D>>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferPoolConfig {
    /// Size of each pool buffer. Larger requests get a page of their own.
    pub page_size: u64,
}

impl Default for BufferPoolConfig {
    fn default() -> Self {
        Self {
            page_size: 16 << 20,
        }
    }
}

struct PoolPage<D: RenderDevice> {
    page: Arc<BufferPage<D>>,
    cursor: u64,
}

impl<D: RenderDevice> PoolPage<D> {
    fn reserve(&mut self, size: u64) -> Option<u64> {
        let offset = self.cursor.next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT);
        if self.page.desc.size - offset.min(self.page.desc.size) < size {
            return None;
        }
        self.cursor = offset + size;
        Some(offset)
    }
}

/// Reference [`BufferAllocator`]: bump allocation into fixed-size pages,
/// one list of pages per [`BufferKind`].
///
/// Space is not reclaimed until the allocator itself is dropped.
pub struct LinearBufferAllocator<D: RenderDevice> {
    config: BufferPoolConfig,
    pages: Mutex<FxHashMap<BufferKind, Vec<PoolPage<D>>>>,
}

impl<D: RenderDevice> LinearBufferAllocator<D> {
    #[must_use]
    pub fn new(config: BufferPoolConfig) -> Self {
        Self {
            config,
            pages: Mutex::new(FxHashMap::default()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &BufferPoolConfig {
        &self.config
    }

    /// Number of pool buffers created for `kind`.
    #[must_use]
    pub fn page_count(&self, kind: BufferKind) -> usize {
        self.pages.lock().get(&kind).map_or(0, Vec::len)
    }
}

impl<D: RenderDevice> BufferAllocator<D> for LinearBufferAllocator<D> {
    fn allocate_buffer_space(
        &self,
        device: &D,
        kind: BufferKind,
        data: Vec<u8>,
    ) -> Result<Arc<BufferSuballocation<D>>> {
        let size = data.len() as u64;
        if size == 0 || size % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
            return Err(Error::InvalidConfig(format!(
                "{kind:?} allocation of {size} bytes is not a positive multiple of {}",
                wgpu::COPY_BUFFER_ALIGNMENT
            )));
        }

        let mut pages = self.pages.lock();
        let list = pages.entry(kind).or_default();

        if let Some(last) = list.last_mut()
            && let Some(offset) = last.reserve(size)
        {
            let page = Arc::clone(&last.page);
            return Ok(Arc::new(BufferSuballocation::new(page, kind, offset, data)));
        }

        let desc = BufferDesc {
            label: format!("{kind:?} Pool {}", list.len()),
            size: size.max(self.config.page_size),
            usage: kind.usage(),
        };
        let buffer = device.create_buffer(&desc)?;
        log::debug!("Created {} byte {kind:?} pool buffer", desc.size);

        let mut page = PoolPage {
            page: Arc::new(BufferPage { buffer, desc }),
            cursor: 0,
        };
        let offset = page.reserve(size).unwrap_or_default();
        let shared = Arc::clone(&page.page);
        list.push(page);
        Ok(Arc::new(BufferSuballocation::new(shared, kind, offset, data)))
    }
}
