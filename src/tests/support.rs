//! Shared fixtures for the behaviour tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use node_host::{ImageHandle, NodeHooks, Size};

use crate::config::PreviewConfig;
use crate::error::PreviewError;
use crate::extension::{FixedPicker, PreviewEvent, PreviewExtension};
use crate::files::{FileKind, FileService, LocalFileService, Resource, UploadFile, UploadResponse};
use crate::loader::{ImageLoader, LoadOutcome, LoadTicket};
use crate::node::{PreviewNode, standard_node};

/// A solid image of the given size.
pub fn image_of(width: u32, height: u32) -> ImageHandle {
    ImageHandle::from_rgba8(vec![128; (width * height * 4) as usize], width, height)
        .expect("valid test image")
}

/// PNG bytes of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([1, 2, 3, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode test png");
    out.into_inner()
}

#[derive(Default)]
struct MockState {
    requests: Vec<LoadTicket>,
    waiting: VecDeque<LoadTicket>,
    ready: VecDeque<LoadOutcome>,
}

/// Loader whose completions the test triggers explicitly.
///
/// Clones share state, so a test can keep a handle after boxing one into an
/// extension.
#[derive(Clone, Default)]
pub struct MockLoader {
    state: Rc<RefCell<MockState>>,
}

impl MockLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request ever issued, oldest first.
    pub fn requests(&self) -> Vec<LoadTicket> {
        self.state.borrow().requests.clone()
    }

    pub fn requested_keys(&self) -> Vec<String> {
        self.state
            .borrow()
            .requests
            .iter()
            .map(|t| t.key.as_str().to_string())
            .collect()
    }

    pub fn request_count(&self, key: &str) -> usize {
        self.state
            .borrow()
            .requests
            .iter()
            .filter(|t| t.key.as_str() == key)
            .count()
    }

    /// Finish the oldest outstanding request with `image`.
    pub fn complete_next(&self, image: ImageHandle) {
        let mut state = self.state.borrow_mut();
        let ticket = state.waiting.pop_front().expect("no outstanding request");
        state.ready.push_back(LoadOutcome::Loaded { ticket, image });
    }

    /// Fail the oldest outstanding request.
    pub fn fail_next(&self, error: &str) {
        let mut state = self.state.borrow_mut();
        let ticket = state.waiting.pop_front().expect("no outstanding request");
        state.ready.push_back(LoadOutcome::Failed {
            ticket,
            error: error.to_string(),
        });
    }

    /// Finish the oldest outstanding request for `key` with `image`.
    pub fn complete(&self, key: &str, image: ImageHandle) {
        let mut state = self.state.borrow_mut();
        let index = state
            .waiting
            .iter()
            .position(|t| t.key.as_str() == key)
            .expect("no outstanding request for key");
        let ticket = state.waiting.remove(index).expect("index in range");
        state.ready.push_back(LoadOutcome::Loaded { ticket, image });
    }
}

impl ImageLoader for MockLoader {
    fn request(&mut self, ticket: LoadTicket) {
        let mut state = self.state.borrow_mut();
        state.requests.push(ticket.clone());
        state.waiting.push_back(ticket);
    }

    fn take_one_result(&mut self) -> Option<LoadOutcome> {
        self.state.borrow_mut().ready.pop_front()
    }

    fn pending_count(&self) -> usize {
        let state = self.state.borrow();
        state.waiting.len() + state.ready.len()
    }
}

/// File service whose uploads always fail.
pub struct RejectingFiles;

impl FileService for RejectingFiles {
    fn resolve(&self, filename: &str, _kind: FileKind, _freshness: u64) -> Resource {
        Resource::Path(filename.into())
    }

    fn upload(&self, file: &UploadFile, _overwrite: bool) -> Result<UploadResponse, PreviewError> {
        Err(PreviewError::UploadRejected(file.name.clone()))
    }

    fn list_inputs(&self) -> Result<Vec<String>, PreviewError> {
        Ok(Vec::new())
    }
}

/// Everything a node test needs to hold on to.
pub struct Harness {
    pub preview: PreviewNode,
    pub loader: MockLoader,
}

/// Options for [`harness`].
pub struct HarnessOptions {
    pub config: PreviewConfig,
    pub files: std::sync::Arc<dyn FileService>,
    pub picker: FixedPicker,
    pub hooks: NodeHooks<PreviewExtension, PreviewEvent>,
    pub image_options: Vec<String>,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            config: PreviewConfig::default(),
            files: std::sync::Arc::new(LocalFileService::new(std::env::temp_dir())),
            picker: FixedPicker(None),
            hooks: NodeHooks::new(),
            image_options: vec!["a.png".to_string(), "b.png".to_string()],
        }
    }
}

/// A standard node with a mock loader, not yet created.
pub fn harness(options: HarnessOptions) -> Harness {
    let loader = MockLoader::new();
    let extension = PreviewExtension::new(
        &options.config,
        Box::new(loader.clone()),
        options.files,
        Box::new(options.picker),
    );
    let node = standard_node(Size::new(420.0, 685.0), options.image_options);
    Harness {
        preview: PreviewNode::new(node, options.hooks, extension),
        loader,
    }
}
