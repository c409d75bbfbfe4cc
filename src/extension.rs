//! The node extension: hook handlers, widget wiring and event routing.

use std::path::PathBuf;
use std::sync::Arc;

use node_host::{ButtonWidget, Node, NodeHooks, Surface};
use web_time::Instant;

use crate::config::{LayoutConfig, PreviewConfig};
use crate::constants::{IMAGE_WIDGET, SOURCE_WIDGET, UPLOAD_BUTTON, URL_WIDGET};
use crate::controller::SourceModeController;
use crate::error::PreviewError;
use crate::files::{FileKind, FileService, UploadFile};
use crate::fit_box::draw_preview;
use crate::loader::ImageLoader;
use crate::upload::{UploadBridge, select_uploaded};

/// Messages produced by the node's widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewEvent {
    /// `source` selector changed
    SourceChanged(String),
    /// `url` text field changed
    UrlChanged(String),
    /// `image` selector changed
    ImageChanged(String),
    /// Upload button pressed
    ChooseFile,
}

/// Asks the user for an image file to upload.
pub trait FilePicker {
    fn pick_image(&self) -> Option<PathBuf>;
}

/// Native file dialog filtered to image extensions.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogPicker;

#[cfg(not(target_arch = "wasm32"))]
impl FilePicker for DialogPicker {
    fn pick_image(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Choose image to upload")
            .add_filter("Images", crate::constants::IMAGE_EXTENSIONS)
            .pick_file()
    }
}

/// Picker that always answers with the same path, or never answers.
#[derive(Debug, Default, Clone)]
pub struct FixedPicker(pub Option<PathBuf>);

impl FilePicker for FixedPicker {
    fn pick_image(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// Per-node extension state. Handed to every hook as `&mut Self`.
pub struct PreviewExtension {
    controller: SourceModeController,
    loader: Box<dyn ImageLoader>,
    uploads: UploadBridge,
    picker: Box<dyn FilePicker>,
    layout: LayoutConfig,
    /// Set once the node's widgets are wired; every hook is inert until then.
    enabled: bool,
}

impl PreviewExtension {
    pub fn new(
        config: &PreviewConfig,
        loader: Box<dyn ImageLoader>,
        files: Arc<dyn FileService>,
        picker: Box<dyn FilePicker>,
    ) -> Self {
        Self {
            controller: SourceModeController::new(config.preview.reload_delay()),
            loader,
            uploads: UploadBridge::new(files, config.preview.overwrite_uploads),
            picker,
            layout: config.layout.clone(),
            enabled: false,
        }
    }

    /// Append the extension's handlers after whatever is already registered.
    pub fn register(hooks: &mut NodeHooks<Self, PreviewEvent>) {
        hooks.on_created(|ext, node| ext.on_created(node));
        hooks.on_configure(|ext, node| ext.on_configure(node, Instant::now()));
        hooks.on_draw_foreground(|ext, node, surface| ext.on_draw_foreground(node, surface));
    }

    pub fn controller(&self) -> &SourceModeController {
        &self.controller
    }

    pub fn loader(&self) -> &dyn ImageLoader {
        self.loader.as_ref()
    }

    pub fn uploads(&self) -> &UploadBridge {
        &self.uploads
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn on_created(&mut self, node: &mut Node<PreviewEvent>) {
        if let Err(e) = Self::wire_widgets(node) {
            log::warn!("Preview disabled for {}: {}", node.type_name(), e);
            return;
        }
        self.enabled = true;
        self.controller
            .on_node_created(&node.widgets, self.loader.as_mut());
    }

    fn wire_widgets(node: &mut Node<PreviewEvent>) -> Result<(), PreviewError> {
        if node.widgets.combo(SOURCE_WIDGET).is_none() {
            return Err(PreviewError::MissingWidget(SOURCE_WIDGET.to_string()));
        }
        if node.widgets.text(URL_WIDGET).is_none() {
            return Err(PreviewError::MissingWidget(URL_WIDGET.to_string()));
        }

        node.widgets
            .push(ButtonWidget::new(UPLOAD_BUTTON, |_| PreviewEvent::ChooseFile));

        if let Some(source) = node.widgets.combo_mut(SOURCE_WIDGET) {
            source
                .on_change_mut()
                .push(|value: &String| Some(PreviewEvent::SourceChanged(value.clone())));
        }
        if let Some(url) = node.widgets.text_mut(URL_WIDGET) {
            url.on_change_mut()
                .push(|value: &String| Some(PreviewEvent::UrlChanged(value.clone())));
        }
        if let Some(image) = node.widgets.combo_mut(IMAGE_WIDGET) {
            image
                .on_change_mut()
                .push(|value: &String| Some(PreviewEvent::ImageChanged(value.clone())));
        }
        Ok(())
    }

    fn on_configure(&mut self, node: &mut Node<PreviewEvent>, now: Instant) {
        if !self.enabled {
            return;
        }
        self.controller.on_configure(&node.widgets, now);
    }

    fn on_draw_foreground(&self, node: &Node<PreviewEvent>, surface: &mut dyn Surface) {
        if !self.enabled {
            return;
        }
        if let Some(image) = self.controller.current_image() {
            draw_preview(image, node.size(), &self.layout, surface);
        }
    }

    /// Route one widget event.
    pub fn update(&mut self, node: &mut Node<PreviewEvent>, event: PreviewEvent) {
        match event {
            PreviewEvent::SourceChanged(value) => {
                self.controller.on_mode_changed(
                    &value,
                    &node.widgets,
                    self.loader.as_mut(),
                    node.canvas(),
                );
            }
            PreviewEvent::UrlChanged(value) => {
                self.controller.on_url_changed(&value, self.loader.as_mut());
            }
            PreviewEvent::ImageChanged(value) => {
                self.controller.on_image_changed(&value, self.loader.as_mut());
            }
            PreviewEvent::ChooseFile => {
                let Some(path) = self.picker.pick_image() else {
                    log::debug!("Upload cancelled");
                    return;
                };
                let started = UploadFile::from_path(&path).and_then(|file| self.upload(file));
                if let Err(e) = started {
                    log::error!("Upload failed: {}", e);
                }
            }
        }
    }

    /// Start uploading `file`; it is selected once the upload finishes.
    pub fn upload(&mut self, file: UploadFile) -> Result<(), PreviewError> {
        self.uploads.on_user_picked_file(file)
    }

    /// Apply finished uploads, fire a due reload and apply finished loads.
    ///
    /// Returns the number of load outcomes applied.
    pub fn tick(&mut self, node: &mut Node<PreviewEvent>, now: Instant) -> usize {
        if !self.enabled {
            return 0;
        }
        while let Some(result) = self.uploads.take_one_result() {
            match result {
                Ok(response) => {
                    log::info!("Uploaded {:?}", response.name);
                    if response.kind != FileKind::Input {
                        log::warn!(
                            "Upload {:?} stored as {} file, not an input",
                            response.name,
                            response.kind.as_str()
                        );
                    }
                    for event in select_uploaded(&mut node.widgets, &response.name) {
                        self.update(node, event);
                    }
                }
                Err(e) => log::error!("Upload failed: {}", e),
            }
        }

        self.controller
            .tick(now, &node.widgets, self.loader.as_mut(), node.canvas())
    }
}

impl std::fmt::Debug for PreviewExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewExtension")
            .field("controller", &self.controller)
            .field("pending_loads", &self.loader.pending_count())
            .field("uploads", &self.uploads)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
