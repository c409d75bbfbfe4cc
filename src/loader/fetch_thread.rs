//! Background thread for image fetching and decoding.
//!
//! Requests are resolved to a [`Resource`] on the caller's thread and handed
//! to a dispatcher thread, which starts one short-lived worker per fetch.
//! Fetches never queue behind each other, so a stalled URL cannot hold back
//! a later load, and results arrive in completion order. Results are polled
//! from the UI thread with [`FetchThread::take_one_result`].

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use super::{Fetcher, ImageLoader, LoadOutcome, LoadTicket};
use crate::error::PreviewError;
use crate::files::{FileKind, FileService, Resource, freshness_token};
use crate::mode::SourceMode;

/// One unit of work for the fetch thread.
struct FetchJob {
    ticket: LoadTicket,
    resource: Resource,
}

/// Message sent to the fetch thread.
enum ThreadMessage {
    Fetch(FetchJob),
    Shutdown,
}

/// [`ImageLoader`] backed by a dedicated thread.
pub struct FetchThread {
    /// Sender for requests to the background thread
    request_tx: Sender<ThreadMessage>,
    /// Receiver for results from the background thread
    result_rx: Receiver<LoadOutcome>,
    /// Handle to the dispatcher thread (for joining on drop)
    thread_handle: Option<JoinHandle<()>>,
    files: Arc<dyn FileService>,
    pending: usize,
}

impl FetchThread {
    /// Spawn the fetch thread.
    pub fn spawn(files: Arc<dyn FileService>, fetcher: Fetcher) -> Result<Self, PreviewError> {
        let (request_tx, request_rx) = mpsc::channel::<ThreadMessage>();
        let (result_tx, result_rx) = mpsc::channel::<LoadOutcome>();

        let thread_handle = thread::Builder::new()
            .name("image-fetch".to_string())
            .spawn(move || {
                log::debug!("Image fetch thread started");
                Self::thread_loop(&fetcher, request_rx, result_tx);
                log::debug!("Image fetch thread exiting");
            })
            .map_err(|e| PreviewError::Worker(format!("Failed to spawn fetch thread: {}", e)))?;

        Ok(Self {
            request_tx,
            result_rx,
            thread_handle: Some(thread_handle),
            files,
            pending: 0,
        })
    }

    fn thread_loop(
        fetcher: &Fetcher,
        request_rx: Receiver<ThreadMessage>,
        result_tx: Sender<LoadOutcome>,
    ) {
        while let Ok(message) = request_rx.recv() {
            let job = match message {
                ThreadMessage::Fetch(job) => job,
                ThreadMessage::Shutdown => break,
            };

            let ticket = job.ticket.clone();
            let fetcher = fetcher.clone();
            let worker_tx = result_tx.clone();
            let spawned = thread::Builder::new()
                .name("image-fetch-job".to_string())
                .spawn(move || {
                    // Receiver gone means the loader was dropped; nobody wants the result.
                    let _ = worker_tx.send(Self::run_job(&fetcher, job));
                });

            if let Err(e) = spawned {
                log::error!("Failed to spawn fetch worker: {}", e);
                let outcome = LoadOutcome::Failed {
                    ticket,
                    error: format!("Failed to spawn fetch worker: {}", e),
                };
                if result_tx.send(outcome).is_err() {
                    break;
                }
            }
        }
    }

    fn run_job(fetcher: &Fetcher, job: FetchJob) -> LoadOutcome {
        log::debug!("Fetching {:?}", job.resource);
        match fetcher.load(&job.resource) {
            Ok(image) => LoadOutcome::Loaded {
                ticket: job.ticket,
                image,
            },
            Err(e) => LoadOutcome::Failed {
                ticket: job.ticket,
                error: e.to_string(),
            },
        }
    }

    /// Where the bytes for `ticket` come from.
    fn resource_for(&self, ticket: &LoadTicket) -> Resource {
        match ticket.mode {
            SourceMode::Url => Resource::Http(ticket.key.as_str().to_string()),
            SourceMode::File => {
                self.files
                    .resolve(ticket.key.as_str(), FileKind::Input, freshness_token())
            }
        }
    }
}

impl ImageLoader for FetchThread {
    fn request(&mut self, ticket: LoadTicket) {
        let resource = self.resource_for(&ticket);
        let job = FetchJob { ticket, resource };
        if self.request_tx.send(ThreadMessage::Fetch(job)).is_err() {
            log::error!("Failed to send fetch request: channel closed");
        } else {
            self.pending += 1;
        }
    }

    fn take_one_result(&mut self) -> Option<LoadOutcome> {
        match self.result_rx.try_recv() {
            Ok(outcome) => {
                self.pending = self.pending.saturating_sub(1);
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::warn!("Fetch thread disconnected");
                None
            }
        }
    }

    fn pending_count(&self) -> usize {
        self.pending
    }
}

// Only the dispatcher is joined. Workers still fetching are left detached.
impl Drop for FetchThread {
    fn drop(&mut self) {
        let _ = self.request_tx.send(ThreadMessage::Shutdown);

        if let Some(handle) = self.thread_handle.take() {
            if let Err(e) = handle.join() {
                log::warn!("Fetch thread panicked: {:?}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::files::LocalFileService;
    use crate::mode::SourceKey;

    fn wait_for(loader: &mut FetchThread) -> LoadOutcome {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(outcome) = loader.take_one_result() {
                return outcome;
            }
            assert!(Instant::now() < deadline, "fetch thread never answered");
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn ticket(mode: SourceMode, key: &str) -> LoadTicket {
        LoadTicket {
            mode,
            generation: 7,
            key: SourceKey::parse(Some(key)).unwrap(),
        }
    }

    fn spawn_in(dir: &std::path::Path) -> FetchThread {
        let files: Arc<dyn FileService> = Arc::new(LocalFileService::new(dir));
        let agent = ureq::AgentBuilder::new()
            .timeout_read(Duration::from_secs(30))
            .build();
        FetchThread::spawn(files, Fetcher::new(agent, 1 << 20)).unwrap()
    }

    /// A server that accepts connections into its backlog and never answers.
    fn silent_server() -> (std::net::TcpListener, String) {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/stalled.png", listener.local_addr().unwrap());
        (listener, url)
    }

    #[test]
    fn test_file_mode_loads_from_input_dir() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::new(5, 3)
            .save(dir.path().join("pic.png"))
            .unwrap();

        let mut loader = spawn_in(dir.path());
        loader.request(ticket(SourceMode::File, "pic.png"));
        assert_eq!(loader.pending_count(), 1);

        match wait_for(&mut loader) {
            LoadOutcome::Loaded { ticket, image } => {
                assert_eq!(ticket.generation, 7);
                assert_eq!(image.dimensions(), (5, 3));
            }
            LoadOutcome::Failed { error, .. } => panic!("load failed: {}", error),
        }
        assert_eq!(loader.pending_count(), 0);
    }

    #[test]
    fn test_missing_file_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = spawn_in(dir.path());
        loader.request(ticket(SourceMode::File, "nope.png"));

        let outcome = wait_for(&mut loader);
        assert!(matches!(outcome, LoadOutcome::Failed { .. }));
        assert_eq!(outcome.ticket().key.as_str(), "nope.png");
    }

    #[test]
    fn test_stalled_url_does_not_delay_file_load() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::new(2, 2)
            .save(dir.path().join("pic.png"))
            .unwrap();
        let (_server, url) = silent_server();

        let mut loader = spawn_in(dir.path());
        loader.request(ticket(SourceMode::Url, &url));
        loader.request(ticket(SourceMode::File, "pic.png"));

        let started = Instant::now();
        let outcome = wait_for(&mut loader);
        assert_eq!(outcome.ticket().key.as_str(), "pic.png");
        assert!(matches!(outcome, LoadOutcome::Loaded { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(loader.pending_count(), 1);
    }

    #[test]
    fn test_drop_does_not_wait_for_stalled_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let (_server, url) = silent_server();

        let mut loader = spawn_in(dir.path());
        loader.request(ticket(SourceMode::Url, &url));
        thread::sleep(Duration::from_millis(50));

        let started = Instant::now();
        drop(loader);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_url_mode_uses_key_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let loader = spawn_in(dir.path());
        assert_eq!(
            loader.resource_for(&ticket(SourceMode::Url, "https://example.com/a.png")),
            Resource::Http("https://example.com/a.png".to_string())
        );
    }
}
