//! Per-mode image cache with deduplicated, generation-checked loading.

use node_host::{ImageHandle, RepaintRequest};

use crate::loader::{ImageLoader, LoadOutcome, LoadTicket};
use crate::mode::{SourceKey, SourceMode};

/// Cache entry for one mode.
///
/// `image` is only ever the decode of `last_key` from a request issued at the
/// current `generation`.
#[derive(Debug, Clone, Default)]
pub struct CacheSlot {
    last_key: Option<SourceKey>,
    image: Option<ImageHandle>,
    generation: u64,
    in_flight: bool,
}

impl CacheSlot {
    pub fn last_key(&self) -> Option<&SourceKey> {
        self.last_key.as_ref()
    }

    pub fn image(&self) -> Option<&ImageHandle> {
        self.image.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// True when the slot holds neither a key nor an image.
    pub fn is_empty(&self) -> bool {
        self.last_key.is_none() && self.image.is_none() && !self.in_flight
    }

    /// Forget key and image. Pending requests become stale.
    pub fn clear(&mut self) {
        self.last_key = None;
        self.image = None;
        self.in_flight = false;
        self.generation += 1;
    }
}

/// What [`ImageCache::ensure_loaded`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadAction {
    /// No key; the slot was cleared
    Cleared,
    /// Key unusable for the mode; the slot was cleared
    Rejected,
    /// The image for this key is already present
    AlreadyLoaded,
    /// A request for this key is already running
    InFlight,
    /// A new request was issued
    Requested(LoadTicket),
}

/// One [`CacheSlot`] per [`SourceMode`].
#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    file: CacheSlot,
    url: CacheSlot,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, mode: SourceMode) -> &CacheSlot {
        match mode {
            SourceMode::File => &self.file,
            SourceMode::Url => &self.url,
        }
    }

    fn slot_mut(&mut self, mode: SourceMode) -> &mut CacheSlot {
        match mode {
            SourceMode::File => &mut self.file,
            SourceMode::Url => &mut self.url,
        }
    }

    /// Image of `mode`'s slot, if loaded.
    pub fn image(&self, mode: SourceMode) -> Option<&ImageHandle> {
        self.slot(mode).image()
    }

    pub fn clear_all(&mut self) {
        self.file.clear();
        self.url.clear();
    }

    /// Make sure the image for `raw_key` is loaded or loading in `mode`'s slot.
    ///
    /// Issues at most one request per key change.
    pub fn ensure_loaded(
        &mut self,
        mode: SourceMode,
        raw_key: Option<&str>,
        loader: &mut dyn ImageLoader,
    ) -> LoadAction {
        let slot = self.slot_mut(mode);

        let Some(key) = SourceKey::parse(raw_key) else {
            slot.clear();
            return LoadAction::Cleared;
        };

        if mode == SourceMode::Url && !key.is_http_url() {
            log::debug!("Ignoring non-http URL {:?}", key.as_str());
            slot.clear();
            return LoadAction::Rejected;
        }

        if slot.last_key.as_ref() == Some(&key) {
            if slot.image.is_some() {
                return LoadAction::AlreadyLoaded;
            }
            if slot.in_flight {
                return LoadAction::InFlight;
            }
        }

        slot.generation += 1;
        slot.last_key = Some(key.clone());
        slot.image = None;
        slot.in_flight = true;

        let ticket = LoadTicket {
            mode,
            generation: slot.generation,
            key,
        };
        log::debug!(
            "Requesting {} image {:?} (generation {})",
            mode,
            ticket.key.as_str(),
            ticket.generation
        );
        loader.request(ticket.clone());
        LoadAction::Requested(ticket)
    }

    /// Apply a finished load. Returns `true` if the slot changed.
    pub fn commit(&mut self, outcome: LoadOutcome) -> bool {
        let ticket = outcome.ticket();
        let slot = self.slot_mut(ticket.mode);

        if ticket.generation != slot.generation {
            log::debug!(
                "Dropping stale {} result for {:?} (generation {} != {})",
                ticket.mode,
                ticket.key.as_str(),
                ticket.generation,
                slot.generation
            );
            return false;
        }

        slot.in_flight = false;
        match outcome {
            LoadOutcome::Loaded { ticket, image } => {
                log::debug!(
                    "Loaded {} image {:?} ({}x{})",
                    ticket.mode,
                    ticket.key.as_str(),
                    image.width(),
                    image.height()
                );
                slot.image = Some(image);
            }
            LoadOutcome::Failed { ticket, error } => {
                log::warn!(
                    "Failed to load {} image {:?}: {}",
                    ticket.mode,
                    ticket.key.as_str(),
                    error
                );
                slot.image = None;
            }
        }
        true
    }

    /// Drain every finished load and request a repaint if anything changed.
    ///
    /// Returns the number of outcomes applied.
    pub fn poll(&mut self, loader: &mut dyn ImageLoader, repaint: &dyn RepaintRequest) -> usize {
        let mut applied = 0;
        while let Some(outcome) = loader.take_one_result() {
            if self.commit(outcome) {
                applied += 1;
            }
        }
        if applied > 0 {
            repaint.set_dirty_canvas(true, false);
        }
        applied
    }
}
