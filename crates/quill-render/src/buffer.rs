//! Append-only output buffers.
//!
//! [`OutputBuffer`] is the sink every dispatch call writes to. Content already
//! appended is never rearranged; the only way to get bytes out is to read
//! [`contents`](OutputBuffer::contents) or consume the buffer.
//!
//! [`BufferPool`] hands out work buffers for nested constructs so that a
//! document with thousands of paragraphs reuses a handful of allocations.

use crate::error::RenderError;

/// Initial capacity of the document output buffer.
pub(crate) const OUTPUT_UNIT: usize = 64;

/// Initial capacity of a pooled work buffer.
pub(crate) const WORK_UNIT: usize = 64;

/// Growable, append-only byte buffer.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
}

impl OutputBuffer {
    /// Create an empty buffer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Append bytes to the end of the buffer.
    ///
    /// Capacity at least doubles whenever it is exceeded, so a sequence of
    /// appends costs amortized linear time.
    pub fn append(&mut self, data: &[u8]) -> Result<(), RenderError> {
        let needed = self.bytes.len() + data.len();
        if needed > self.bytes.capacity() {
            let target = needed.max(self.bytes.capacity() * 2);
            let requested = target - self.bytes.len();
            self.bytes
                .try_reserve_exact(requested)
                .map_err(|source| RenderError::Allocation { requested, source })?;
        }
        self.bytes.extend_from_slice(data);
        Ok(())
    }

    /// Append a string.
    pub fn append_str(&mut self, text: &str) -> Result<(), RenderError> {
        self.append(text.as_bytes())
    }

    /// Current content. Valid until the next mutating call.
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        &self.bytes
    }

    /// Current content decoded as UTF-8.
    pub fn as_str(&self) -> Result<&str, RenderError> {
        Ok(std::str::from_utf8(&self.bytes)?)
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Allocated capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// Consume the buffer and return its content as a `String`.
    pub fn into_string(self) -> Result<String, RenderError> {
        String::from_utf8(self.bytes).map_err(|e| RenderError::InvalidUtf8(e.utf8_error()))
    }

    /// Drop the content but keep the allocation. Only the pool reuses buffers.
    fn clear(&mut self) {
        self.bytes.clear();
    }
}

/// Pool of work buffers for nested construct content.
#[derive(Debug, Default)]
pub struct BufferPool {
    free: Vec<OutputBuffer>,
    outstanding: usize,
}

impl BufferPool {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take an empty buffer from the pool, allocating one if none is free.
    pub fn acquire(&mut self) -> OutputBuffer {
        self.outstanding += 1;
        self.free
            .pop()
            .unwrap_or_else(|| OutputBuffer::with_capacity(WORK_UNIT))
    }

    /// Return a buffer to the pool.
    pub fn release(&mut self, mut buffer: OutputBuffer) {
        buffer.clear();
        self.outstanding = self.outstanding.saturating_sub(1);
        self.free.push(buffer);
    }

    /// Buffers handed out by [`acquire`](Self::acquire) and not yet released.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut buf = OutputBuffer::with_capacity(4);
        buf.append_str("<p>").unwrap();
        buf.append_str("hello").unwrap();
        buf.append_str("</p>").unwrap();
        assert_eq!(buf.contents(), b"<p>hello</p>");
        assert_eq!(buf.len(), 12);
    }

    #[test]
    fn test_growth_at_least_doubles() {
        let mut buf = OutputBuffer::with_capacity(8);
        let initial = buf.capacity();
        buf.append(&vec![b'a'; initial]).unwrap();
        assert_eq!(buf.capacity(), initial);
        buf.append(b"b").unwrap();
        assert!(buf.capacity() >= initial * 2);
    }

    #[test]
    fn test_large_append_reserves_enough() {
        let mut buf = OutputBuffer::with_capacity(2);
        buf.append(&[b'x'; 100]).unwrap();
        assert!(buf.capacity() >= 100);
        assert_eq!(buf.len(), 100);
    }

    #[test]
    fn test_empty_append_is_noop() {
        let mut buf = OutputBuffer::default();
        buf.append(b"").unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_into_string() {
        let mut buf = OutputBuffer::default();
        buf.append_str("héllo").unwrap();
        assert_eq!(buf.into_string().unwrap(), "héllo");
    }

    #[test]
    fn test_into_string_rejects_invalid_utf8() {
        let mut buf = OutputBuffer::default();
        buf.append(&[0xe2, 0x28]).unwrap();
        assert!(matches!(
            buf.into_string(),
            Err(RenderError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_as_str_checks_byte_appends() {
        let mut buf = OutputBuffer::default();
        buf.append_str("ok ").unwrap();
        assert_eq!(buf.as_str().unwrap(), "ok ");
        buf.append(&[0xff]).unwrap();
        assert!(matches!(buf.as_str(), Err(RenderError::InvalidUtf8(_))));
    }

    #[test]
    fn test_pool_reuses_capacity() {
        let mut pool = BufferPool::new();
        let mut buf = pool.acquire();
        buf.append(&[b'z'; 500]).unwrap();
        let capacity = buf.capacity();
        pool.release(buf);

        let reused = pool.acquire();
        assert!(reused.is_empty());
        assert_eq!(reused.capacity(), capacity);
        pool.release(reused);
    }

    #[test]
    fn test_pool_tracks_outstanding() {
        let mut pool = BufferPool::new();
        let a = pool.acquire();
        let b = pool.acquire();
        assert_eq!(pool.outstanding(), 2);
        pool.release(a);
        pool.release(b);
        assert_eq!(pool.outstanding(), 0);
    }
}
