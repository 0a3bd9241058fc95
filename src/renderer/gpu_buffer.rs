use crate::renderer::device::{BufferDesc, RenderDevice, ResourceState};
use crate::renderer::pending::PendingUpload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    Vertex,
    Index,
}

impl BufferKind {
    #[must_use]
    pub fn usage(self) -> wgpu::BufferUsages {
        match self {
            BufferKind::Vertex => wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            BufferKind::Index => wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        }
    }

    /// State a buffer of this kind is left in after upload.
    #[must_use]
    pub fn ready_state(self) -> ResourceState {
        match self {
            BufferKind::Vertex => ResourceState::VertexBuffer,
            BufferKind::Index => ResourceState::IndexBuffer,
        }
    }
}

/// A per-model vertex or index buffer and the bytes it still has to receive.
pub struct GpuBuffer<D: RenderDevice> {
    raw: D::Buffer,
    desc: BufferDesc,
    kind: BufferKind,
    pending: PendingUpload<Vec<u8>>,
}

impl<D: RenderDevice> GpuBuffer<D> {
    #[must_use]
    pub fn new(raw: D::Buffer, desc: BufferDesc, kind: BufferKind, data: Vec<u8>) -> Self {
        Self {
            raw,
            desc,
            kind,
            pending: PendingUpload::new(data),
        }
    }

    #[inline]
    pub fn raw(&self) -> &D::Buffer {
        &self.raw
    }

    #[inline]
    pub fn desc(&self) -> &BufferDesc {
        &self.desc
    }

    #[inline]
    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    #[inline]
    pub fn pending(&self) -> &PendingUpload<Vec<u8>> {
        &self.pending
    }
}

impl<D: RenderDevice> std::fmt::Debug for GpuBuffer<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuBuffer")
            .field("desc", &self.desc)
            .field("kind", &self.kind)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
