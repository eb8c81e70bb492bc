//! Render error types.

use std::collections::TryReserveError;
use std::str::Utf8Error;

/// Fatal condition that aborts a render pass.
///
/// A pass either returns the complete output or exactly one of these.
/// Buffers allocated by the pass are released before the error reaches the caller.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Input or buffered content is not valid UTF-8.
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),
    /// Growing a buffer failed.
    #[error("failed to grow buffer by {requested} bytes: {source}")]
    Allocation {
        /// Number of bytes that could not be reserved.
        requested: usize,
        /// Underlying reservation failure.
        #[source]
        source: TryReserveError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(invalid_from_utf8)]
    fn test_invalid_utf8_display() {
        let err = std::str::from_utf8(&[0x66, 0xff]).unwrap_err();
        let err = RenderError::from(err);
        assert!(err.to_string().starts_with("invalid UTF-8"));
    }

    #[test]
    fn test_allocation_display() {
        let source = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err();
        let err = RenderError::Allocation {
            requested: usize::MAX,
            source,
        };
        assert!(err.to_string().contains("failed to grow buffer"));
    }
}
