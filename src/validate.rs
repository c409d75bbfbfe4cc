//! Checks applied to a node's inputs before it is executed.
//!
//! The preview itself never rejects anything; it just shows nothing for a
//! key it cannot use. Execution needs a usable source, so it is stricter.

use thiserror::Error;

use crate::mode::{SourceKey, SourceMode, is_http_url};

/// Why a node's inputs cannot be executed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter an image URL")]
    MissingUrl,

    #[error("URL must start with http:// or https://")]
    UnsupportedScheme,

    #[error("Invalid image file: {0}")]
    UnknownFile(String),
}

/// Validate the inputs for `mode`. Only the active mode's input is checked.
pub fn validate_source(
    mode: SourceMode,
    image: Option<&str>,
    url: Option<&str>,
    known_inputs: &[String],
) -> Result<(), InputError> {
    match mode {
        SourceMode::Url => {
            let key = SourceKey::parse(url).ok_or(InputError::MissingUrl)?;
            if !is_http_url(key.as_str()) {
                return Err(InputError::UnsupportedScheme);
            }
            Ok(())
        }
        SourceMode::File => {
            let name = image.unwrap_or_default().trim();
            if known_inputs.iter().any(|known| known == name) {
                Ok(())
            } else {
                Err(InputError::UnknownFile(name.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> Vec<String> {
        vec!["a.png".to_string(), "b.jpg".to_string()]
    }

    #[test]
    fn test_url_messages() {
        assert_eq!(
            validate_source(SourceMode::Url, None, Some("  "), &inputs())
                .unwrap_err()
                .to_string(),
            "Please enter an image URL"
        );
        assert_eq!(
            validate_source(SourceMode::Url, None, Some("ftp://x/a.png"), &inputs())
                .unwrap_err()
                .to_string(),
            "URL must start with http:// or https://"
        );
        assert!(validate_source(SourceMode::Url, None, Some("https://x/a.png"), &[]).is_ok());
    }

    #[test]
    fn test_file_must_be_known() {
        assert!(validate_source(SourceMode::File, Some("a.png"), None, &inputs()).is_ok());
        assert_eq!(
            validate_source(SourceMode::File, Some("zzz.png"), None, &inputs()),
            Err(InputError::UnknownFile("zzz.png".to_string()))
        );
        assert_eq!(
            validate_source(SourceMode::File, None, None, &inputs())
                .unwrap_err()
                .to_string(),
            "Invalid image file: "
        );
    }

    #[test]
    fn test_inactive_mode_not_checked() {
        assert!(validate_source(SourceMode::File, Some("a.png"), Some("junk"), &inputs()).is_ok());
    }
}
