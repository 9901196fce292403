use bytes::BytesMut;

/// Hands out transient byte buffers for a single invocation.
///
/// Carries no state, so a fresh one per context costs nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteBufferAllocator;

impl ByteBufferAllocator {
    pub fn new() -> Self {
        Self
    }

    /// An empty buffer with room for at least `capacity` bytes
    pub fn buffer(&self, capacity: usize) -> BytesMut {
        BytesMut::with_capacity(capacity)
    }

    /// A buffer holding a copy of `bytes`
    pub fn buffer_from(&self, bytes: &[u8]) -> BytesMut {
        let mut buffer = self.buffer(bytes.len());
        buffer.extend_from_slice(bytes);
        buffer
    }
}
