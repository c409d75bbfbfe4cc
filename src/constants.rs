//! Global constants for the preview extension

/// Node type the extension attaches to
pub const NODE_TYPE: &str = "LoadImageFileOrURL";

/// Display name of the node
pub const NODE_DISPLAY_NAME: &str = "Load Image (File/URL)";

/// Source selector widget (`file` / `url`)
pub const SOURCE_WIDGET: &str = "source";

/// Input file selector widget
pub const IMAGE_WIDGET: &str = "image";

/// Remote URL text widget
pub const URL_WIDGET: &str = "url";

/// Upload button added by the extension
pub const UPLOAD_BUTTON: &str = "choose file to upload";

/// Placeholder shown in an empty URL field
pub const URL_PLACEHOLDER: &str = "https://example.com/image.png";

/// Default editor server address
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8188";

/// User agent sent with remote image requests
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Upper bound on a downloaded image body
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 64 * 1024 * 1024;

/// Supported image extensions for the upload picker
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff", "tif"];

/// Check if a filename has a supported image extension.
pub fn is_image_filename(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}
