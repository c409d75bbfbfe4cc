//! File service working directly on an input directory.

use std::path::{Path, PathBuf};

use crate::error::PreviewError;

use super::{FileKind, FileService, Resource, UploadFile, UploadResponse};

/// Stores uploads in, and resolves names against, a local directory.
///
/// Every [`FileKind`] maps to the same directory; the freshness token is not
/// needed since nothing sits between the reader and the disk.
#[derive(Debug, Clone)]
pub struct LocalFileService {
    input_dir: PathBuf,
}

impl LocalFileService {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
        }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    // Only the final path component is honoured so names cannot escape the directory.
    fn path_for(&self, filename: &str) -> Option<PathBuf> {
        let name = Path::new(filename).file_name()?;
        Some(self.input_dir.join(name))
    }

    /// First free "stem (n).ext" variant of `name`.
    fn unique_name(&self, name: &str) -> String {
        if !self.input_dir.join(name).exists() {
            return name.to_string();
        }

        let path = Path::new(name);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        (1..)
            .map(|n| format!("{} ({}){}", stem, n, ext))
            .find(|candidate| !self.input_dir.join(candidate).exists())
            .unwrap_or_else(|| name.to_string())
    }
}

impl FileService for LocalFileService {
    fn resolve(&self, filename: &str, _kind: FileKind, _freshness: u64) -> Resource {
        let path = self
            .path_for(filename)
            .unwrap_or_else(|| self.input_dir.join(filename));
        Resource::Path(path)
    }

    fn upload(&self, file: &UploadFile, overwrite: bool) -> Result<UploadResponse, PreviewError> {
        let base = Path::new(&file.name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| PreviewError::UploadRejected(format!("bad filename {:?}", file.name)))?;

        std::fs::create_dir_all(&self.input_dir)?;

        let name = if overwrite {
            base
        } else {
            self.unique_name(&base)
        };
        std::fs::write(self.input_dir.join(&name), &file.bytes)?;
        log::info!("Stored upload as {:?} in {:?}", name, self.input_dir);

        Ok(UploadResponse {
            name,
            subfolder: String::new(),
            kind: FileKind::Input,
        })
    }

    fn list_inputs(&self) -> Result<Vec<String>, PreviewError> {
        if !self.input_dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.input_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_strips_directories() {
        let service = LocalFileService::new("/data/input");
        assert_eq!(
            service.resolve("../../etc/passwd", FileKind::Input, 0),
            Resource::Path(PathBuf::from("/data/input/passwd"))
        );
    }

    #[test]
    fn test_upload_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let service = LocalFileService::new(dir.path());

        let first = service
            .upload(&UploadFile::new("cat.png", vec![1]), true)
            .unwrap();
        let second = service
            .upload(&UploadFile::new("cat.png", vec![2]), true)
            .unwrap();
        assert_eq!(first.name, "cat.png");
        assert_eq!(second.name, "cat.png");
        assert_eq!(std::fs::read(dir.path().join("cat.png")).unwrap(), vec![2]);
    }

    #[test]
    fn test_upload_without_overwrite_renames() {
        let dir = tempfile::tempdir().unwrap();
        let service = LocalFileService::new(dir.path());

        service
            .upload(&UploadFile::new("cat.png", vec![1]), false)
            .unwrap();
        let renamed = service
            .upload(&UploadFile::new("cat.png", vec![2]), false)
            .unwrap();
        assert_eq!(renamed.name, "cat (1).png");
        assert_eq!(
            service.list_inputs().unwrap(),
            vec!["cat (1).png", "cat.png"]
        );
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let service = LocalFileService::new(dir.path().join("absent"));
        assert!(service.list_inputs().unwrap().is_empty());
    }

    #[test]
    fn test_upload_rejects_empty_name() {
        let dir = tempfile::tempdir().unwrap();
        let service = LocalFileService::new(dir.path());
        assert!(service.upload(&UploadFile::new("", vec![1]), true).is_err());
    }
}
