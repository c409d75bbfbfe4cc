//! The editor's file service: retrieving input files and uploading new ones.
//!
//! Two implementations are provided: [`HttpFileService`] talks to a running
//! editor server, [`LocalFileService`] works directly on an input directory.

mod http;
mod local;
mod multipart;

pub use http::HttpFileService;
pub use local::LocalFileService;
pub use multipart::MultipartForm;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PreviewError;

/// Directory classifier understood by the file service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// User-provided inputs (uploads land here)
    #[default]
    Input,
    /// Generated outputs
    Output,
    /// Scratch files
    Temp,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Input => "input",
            FileKind::Output => "output",
            FileKind::Temp => "temp",
        }
    }
}

/// Where the bytes of an image can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Http(String),
    Path(PathBuf),
}

/// A file picked by the user, ready to be uploaded.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Wrap in-memory bytes; the content type is guessed from the name.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = content_type_for(&name).to_string();
        Self {
            name,
            content_type,
            bytes,
        }
    }

    /// Read a file from disk.
    pub fn from_path(path: &Path) -> Result<Self, PreviewError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| PreviewError::UploadRejected(format!("{:?} has no file name", path)))?;
        let bytes = std::fs::read(path)?;
        Ok(Self::new(name, bytes))
    }
}

/// MIME type for an image filename, falling back to a generic byte stream.
pub fn content_type_for(name: &str) -> &'static str {
    image::ImageFormat::from_path(name)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// What the upload endpoint reports back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Name the file was stored under
    pub name: String,
    #[serde(default)]
    pub subfolder: String,
    #[serde(default, rename = "type")]
    pub kind: FileKind,
}

/// File retrieval and upload, as offered by the editor.
pub trait FileService: Send + Sync {
    /// Locate a stored file. `freshness` is appended where an intermediate
    /// cache could otherwise serve an older file under the same name.
    fn resolve(&self, filename: &str, kind: FileKind, freshness: u64) -> Resource;

    /// Store a file, replacing an existing one of the same name if `overwrite`.
    fn upload(&self, file: &UploadFile, overwrite: bool) -> Result<UploadResponse, PreviewError>;

    /// Names of the files in the input directory, sorted.
    fn list_inputs(&self) -> Result<Vec<String>, PreviewError>;
}

/// Milliseconds since the Unix epoch, used as a cache-busting token.
pub fn freshness_token() -> u64 {
    web_time::SystemTime::now()
        .duration_since(web_time::SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
