//! Error types for image acquisition and upload.

use thiserror::Error;

/// Errors raised while fetching, decoding or uploading images.
///
/// None of these reach the host: loads turn them into a failed outcome and
/// uploads log them. They exist so the failure is described precisely in logs.
#[derive(Error, Debug)]
pub enum PreviewError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport-level HTTP failure (DNS, connect, TLS, timeout)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Server answered with a non-success status
    #[error("HTTP {code}: {body}")]
    Status {
        /// Status code
        code: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Image bytes could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),

    /// Response body exceeded the configured limit
    #[error("Image larger than {limit} bytes")]
    TooLarge {
        /// Configured limit in bytes
        limit: u64,
    },

    /// Decoded pixels did not form a valid image
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Upload endpoint answered without a usable filename
    #[error("Upload rejected: {0}")]
    UploadRejected(String),

    /// A widget the extension depends on is missing from the node
    #[error("Missing widget: {0}")]
    MissingWidget(String),

    /// Background worker could not be started or went away
    #[error("Worker error: {0}")]
    Worker(String),
}

impl From<ureq::Error> for PreviewError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, response) => PreviewError::Status {
                code,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => PreviewError::Http(transport.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = PreviewError::Status {
            code: 404,
            body: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: not found");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PreviewError = io.into();
        assert!(matches!(err, PreviewError::Io(_)));
    }
}
