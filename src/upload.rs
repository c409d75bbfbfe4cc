//! Background uploads and selecting the uploaded file.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use node_host::Widgets;

use crate::constants::IMAGE_WIDGET;
use crate::error::PreviewError;
use crate::files::{FileService, UploadFile, UploadResponse};

type UploadResult = Result<UploadResponse, PreviewError>;

/// Runs uploads off the UI thread and hands back their results.
pub struct UploadBridge {
    files: Arc<dyn FileService>,
    overwrite: bool,
    result_tx: Sender<UploadResult>,
    result_rx: Receiver<UploadResult>,
    pending: usize,
}

impl UploadBridge {
    pub fn new(files: Arc<dyn FileService>, overwrite: bool) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        Self {
            files,
            overwrite,
            result_tx,
            result_rx,
            pending: 0,
        }
    }

    /// Start uploading a file the user picked.
    pub fn on_user_picked_file(&mut self, file: UploadFile) -> Result<(), PreviewError> {
        let files = Arc::clone(&self.files);
        let overwrite = self.overwrite;
        let result_tx = self.result_tx.clone();

        log::info!("Uploading {:?} ({} bytes)", file.name, file.bytes.len());
        thread::Builder::new()
            .name("image-upload".to_string())
            .spawn(move || {
                let result = files.upload(&file, overwrite);
                // Receiver gone means the node was removed; nobody wants the result.
                let _ = result_tx.send(result);
            })
            .map_err(|e| PreviewError::Worker(format!("Failed to spawn upload thread: {}", e)))?;

        self.pending += 1;
        Ok(())
    }

    /// Take one finished upload. Non-blocking.
    pub fn take_one_result(&mut self) -> Option<UploadResult> {
        match self.result_rx.try_recv() {
            Ok(result) => {
                self.pending = self.pending.saturating_sub(1);
                Some(result)
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending
    }
}

impl std::fmt::Debug for UploadBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadBridge")
            .field("overwrite", &self.overwrite)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

/// Put an uploaded file into the `image` selector and select it.
///
/// The name is added to the options (kept sorted) if missing, then the
/// selector's change handlers run as if the user had picked it.
pub fn select_uploaded<M>(widgets: &mut Widgets<M>, name: &str) -> Vec<M> {
    let Some(combo) = widgets.combo_mut(IMAGE_WIDGET) else {
        log::warn!("No {:?} selector to receive upload {:?}", IMAGE_WIDGET, name);
        return Vec::new();
    };

    if combo.insert_option_sorted(name) {
        log::debug!("Added {:?} to the image list", name);
    }
    widgets.change(IMAGE_WIDGET, name)
}
