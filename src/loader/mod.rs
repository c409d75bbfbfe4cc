//! Asynchronous image acquisition.
//!
//! The cache hands a [`LoadTicket`] to an [`ImageLoader`] and later drains
//! [`LoadOutcome`]s from it on the UI thread. Loaders never touch the cache;
//! deciding whether an outcome is still wanted is the cache's job.

mod fetch;
mod fetch_thread;

pub use fetch::{Fetcher, decode_image};
pub use fetch_thread::FetchThread;

use node_host::ImageHandle;

use crate::mode::{SourceKey, SourceMode};

/// Identifies one load request: which slot, at which generation, for which key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub mode: SourceMode,
    pub generation: u64,
    pub key: SourceKey,
}

/// Result of a load request, delivered back to the UI thread.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Image fetched and decoded
    Loaded {
        ticket: LoadTicket,
        image: ImageHandle,
    },
    /// Fetch or decode failed
    Failed { ticket: LoadTicket, error: String },
}

impl LoadOutcome {
    pub fn ticket(&self) -> &LoadTicket {
        match self {
            LoadOutcome::Loaded { ticket, .. } => ticket,
            LoadOutcome::Failed { ticket, .. } => ticket,
        }
    }
}

/// Something that can fetch and decode images without blocking the caller.
pub trait ImageLoader {
    /// Start loading the image named by `ticket.key`. Must not block.
    fn request(&mut self, ticket: LoadTicket);

    /// Take one completed outcome, oldest first. Non-blocking.
    fn take_one_result(&mut self) -> Option<LoadOutcome>;

    /// Number of requests issued but not yet taken.
    fn pending_count(&self) -> usize;
}
