//! File service backed by a running editor server.

use crate::config::ServerConfig;
use crate::constants::NODE_TYPE;
use crate::error::PreviewError;

use super::{FileKind, FileService, MultipartForm, Resource, UploadFile, UploadResponse};

/// Talks to the editor's `/view`, `/upload/image` and `/object_info` endpoints.
pub struct HttpFileService {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpFileService {
    pub fn new(base_url: impl Into<String>, agent: ureq::Agent) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, agent }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.base_url.clone(), config.agent())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The view URL for a stored file.
    pub fn view_url(&self, filename: &str, kind: FileKind, freshness: u64) -> String {
        format!(
            "{}?filename={}&type={}&t={}",
            self.endpoint("/view"),
            urlencoding::encode(filename),
            kind.as_str(),
            freshness
        )
    }
}

impl std::fmt::Debug for HttpFileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFileService")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl FileService for HttpFileService {
    fn resolve(&self, filename: &str, kind: FileKind, freshness: u64) -> Resource {
        Resource::Http(self.view_url(filename, kind, freshness))
    }

    fn upload(&self, file: &UploadFile, overwrite: bool) -> Result<UploadResponse, PreviewError> {
        let mut form = MultipartForm::new();
        form.add_file("image", &file.name, &file.content_type, &file.bytes);
        form.add_text("overwrite", if overwrite { "true" } else { "false" });

        let content_type = form.content_type();
        let url = self.endpoint("/upload/image");
        log::debug!("POST {} ({} bytes)", url, file.bytes.len());

        let response = self
            .agent
            .post(&url)
            .set("Content-Type", &content_type)
            .send_bytes(&form.finish())?;

        let body = response.into_string()?;
        let parsed: UploadResponse = serde_json::from_str(&body)?;
        if parsed.name.trim().is_empty() {
            return Err(PreviewError::UploadRejected(format!(
                "no filename in response: {}",
                body
            )));
        }
        Ok(parsed)
    }

    fn list_inputs(&self) -> Result<Vec<String>, PreviewError> {
        let url = self.endpoint(&format!("/object_info/{}", NODE_TYPE));
        let body = self.agent.get(&url).call()?.into_string()?;
        parse_input_listing(&body)
    }
}

/// Extract the image option list from an `/object_info/<node>` response.
fn parse_input_listing(body: &str) -> Result<Vec<String>, PreviewError> {
    let info: serde_json::Value = serde_json::from_str(body)?;
    let options = info
        .get(NODE_TYPE)
        .unwrap_or(&info)
        .pointer("/input/required/image/0")
        .and_then(|v| v.as_array())
        .ok_or_else(|| PreviewError::Http(format!("no image listing for {}", NODE_TYPE)))?;

    let mut names: Vec<String> = options
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> HttpFileService {
        HttpFileService::new("http://127.0.0.1:8188/", ureq::AgentBuilder::new().build())
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        assert_eq!(service().base_url(), "http://127.0.0.1:8188");
    }

    #[test]
    fn test_view_url_encodes_filename() {
        let resource = service().resolve("my cat&dog.png", FileKind::Input, 1700000000000);
        assert_eq!(
            resource,
            Resource::Http(
                "http://127.0.0.1:8188/view?filename=my%20cat%26dog.png&type=input&t=1700000000000"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_listing_nested_under_node_type() {
        let body = r#"{"LoadImageFileOrURL": {"input": {"required": {"image": [["b.png", "a.png"], {"image_upload": true}]}}}}"#;
        assert_eq!(parse_input_listing(body).unwrap(), vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_listing_missing_is_error() {
        assert!(parse_input_listing(r#"{"input": {}}"#).is_err());
    }
}
