//! Central error types for cursor loading.
//!
//! Lookups on [`CursorLoader`](crate::CursorLoader) report failures as `None`;
//! these typed errors exist so the decode path can say *why* a handle could
//! not be resolved before that detail is logged and dropped.

use crate::cursor::CursorHandle;
use thiserror::Error;

/// Main error type for cursor decoding and loader configuration.
#[derive(Error, Debug)]
pub enum CursorError {
    /// The OS has no icon information for the handle (stale or bogus handle)
    #[error("Invalid cursor handle {0}")]
    InvalidHandle(CursorHandle),

    /// Icon information came back without a mask bitmap
    #[error("Cursor {0} has no mask bitmap")]
    MissingMask(CursorHandle),

    /// A named GDI call reported failure
    #[error("GDI call {call} failed")]
    Gdi { call: &'static str },

    /// windows-rs surfaced an HRESULT
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    Windows(#[from] windows::core::Error),

    /// Raw bitmap data does not describe a decodable image
    #[error("Invalid bitmap: {0}")]
    InvalidBitmap(String),

    /// Loader configuration rejected
    #[error("Config error: {0}")]
    Config(String),

    /// Reading config or writing dumps failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image encoding failed
    #[error("Image error: {0}")]
    Image(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for CursorError {
    fn from(err: image::ImageError) -> Self {
        CursorError::Image(err.to_string())
    }
}

impl From<String> for CursorError {
    fn from(msg: String) -> Self {
        CursorError::Other(msg)
    }
}

impl From<&str> for CursorError {
    fn from(msg: &str) -> Self {
        CursorError::Other(msg.to_string())
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error, converting it to CursorError::Other.
    fn context(self, msg: &str) -> CursorResult<T>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F: FnOnce() -> String>(self, f: F) -> CursorResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context(self, msg: &str) -> CursorResult<T> {
        self.map_err(|e| CursorError::Other(format!("{}: {}", msg, e)))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> CursorResult<T> {
        self.map_err(|e| CursorError::Other(format!("{}: {}", f(), e)))
    }
}

/// Extension trait for turning a missing value into an error.
pub trait OptionExt<T> {
    /// Convert None to CursorError::Other with the given message.
    fn context(self, msg: &str) -> CursorResult<T>;

    /// Convert None to CursorError::Other with a lazily evaluated message.
    fn with_context<F: FnOnce() -> String>(self, f: F) -> CursorResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn context(self, msg: &str) -> CursorResult<T> {
        self.ok_or_else(|| CursorError::Other(msg.to_string()))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> CursorResult<T> {
        self.ok_or_else(|| CursorError::Other(f()))
    }
}

/// Type alias for Results using CursorError.
pub type CursorResult<T> = Result<T, CursorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CursorError::InvalidHandle(CursorHandle::from_raw(0x1234));
        assert_eq!(err.to_string(), "Invalid cursor handle 0x1234");

        let err = CursorError::Gdi { call: "GetDIBits" };
        assert_eq!(err.to_string(), "GDI call GetDIBits failed");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CursorError = io_err.into();
        assert!(matches!(err, CursorError::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: CursorError = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_from_string() {
        let err: CursorError = "test error".into();
        assert!(matches!(err, CursorError::Other(_)));
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<(), &str> = Err("original error");
        let msg = result.context("operation failed").unwrap_err().to_string();
        assert!(msg.contains("operation failed"));
        assert!(msg.contains("original error"));
    }

    #[test]
    fn test_result_ext_with_context() {
        let result: Result<(), &str> = Err("inner");
        let msg = result
            .with_context(|| format!("ctx-{}", 42))
            .unwrap_err()
            .to_string();
        assert!(msg.contains("ctx-42"));
        assert!(msg.contains("inner"));
    }

    #[test]
    fn test_option_ext_context() {
        let opt: Option<i32> = None;
        let result = opt.context("value was missing");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("value was missing"));

        assert_eq!(Some(42).context("should not appear").unwrap(), 42);
    }
}
