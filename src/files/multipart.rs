//! Minimal `multipart/form-data` encoder for the upload endpoint.

/// A form body under construction.
#[derive(Debug)]
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        let nanos = web_time::SystemTime::now()
            .duration_since(web_time::SystemTime::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        Self::with_boundary(format!("----source-preview-{:032x}", nanos))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            body: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn add_text(&mut self, name: &str, value: &str) {
        self.open_part();
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                escape(name)
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
    }

    pub fn add_file(&mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) {
        self.open_part();
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                escape(name),
                escape(filename),
                content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
    }

    /// Close the form and return the encoded body.
    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }

    fn open_part(&mut self) {
        self.body
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

// Quotes and line breaks would end the header value early.
fn escape(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_layout() {
        let mut form = MultipartForm::with_boundary("XYZ");
        form.add_file("image", "cat.png", "image/png", b"PNGDATA");
        form.add_text("overwrite", "true");
        assert_eq!(form.content_type(), "multipart/form-data; boundary=XYZ");

        let body = String::from_utf8(form.finish()).unwrap();
        let expected = "--XYZ\r\n\
            Content-Disposition: form-data; name=\"image\"; filename=\"cat.png\"\r\n\
            Content-Type: image/png\r\n\r\n\
            PNGDATA\r\n\
            --XYZ\r\n\
            Content-Disposition: form-data; name=\"overwrite\"\r\n\r\n\
            true\r\n\
            --XYZ--\r\n";
        assert_eq!(body, expected);
    }

    #[test]
    fn test_filename_quotes_escaped() {
        let mut form = MultipartForm::with_boundary("B");
        form.add_file("image", "a\"b.png", "image/png", b"");
        let body = String::from_utf8(form.finish()).unwrap();
        assert!(body.contains("filename=\"a%22b.png\""));
    }

    #[test]
    fn test_generated_boundary_prefix() {
        let form = MultipartForm::new();
        assert!(form.boundary().starts_with("----source-preview-"));
    }
}
