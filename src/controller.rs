//! Source mode tracking and the reactions to widget and lifecycle events.

use std::time::Duration;

use node_host::{ImageHandle, RepaintRequest, Widgets};
use web_time::Instant;

use crate::cache::{ImageCache, LoadAction};
use crate::constants::{IMAGE_WIDGET, SOURCE_WIDGET, URL_WIDGET};
use crate::loader::ImageLoader;
use crate::mode::SourceMode;
use crate::schedule::DeferredReload;

/// Everything the preview remembers about one node instance.
#[derive(Debug, Clone, Default)]
pub struct PreviewState {
    pub mode: SourceMode,
    pub cache: ImageCache,
}

impl PreviewState {
    /// Forget both slots and go back to the default mode.
    pub fn reset(&mut self) {
        self.mode = SourceMode::default();
        self.cache.clear_all();
    }
}

/// Read the active mode from the `source` selector.
pub fn read_mode<M>(widgets: &Widgets<M>) -> SourceMode {
    SourceMode::from_selector(widgets.value(SOURCE_WIDGET))
}

/// The raw key for `mode`: the `image` selector or the `url` text field.
pub fn key_for<M>(mode: SourceMode, widgets: &Widgets<M>) -> Option<&str> {
    match mode {
        SourceMode::File => widgets.value(IMAGE_WIDGET),
        SourceMode::Url => widgets.value(URL_WIDGET),
    }
}

/// Drives the per-node [`PreviewState`].
#[derive(Debug, Clone)]
pub struct SourceModeController {
    state: PreviewState,
    reload: DeferredReload,
}

impl SourceModeController {
    pub fn new(reload_delay: Duration) -> Self {
        Self {
            state: PreviewState::default(),
            reload: DeferredReload::new(reload_delay),
        }
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn mode(&self) -> SourceMode {
        self.state.mode
    }

    /// Image of the active mode, if loaded.
    pub fn current_image(&self) -> Option<&ImageHandle> {
        self.state.cache.image(self.state.mode)
    }

    pub fn reload_pending(&self) -> bool {
        self.reload.is_pending()
    }

    /// Node instantiated: reset and load the active mode's image right away.
    pub fn on_node_created<M>(
        &mut self,
        widgets: &Widgets<M>,
        loader: &mut dyn ImageLoader,
    ) -> LoadAction {
        self.state.reset();
        self.reload.cancel();
        self.state.mode = read_mode(widgets);
        log::info!("Preview created in {} mode", self.state.mode);
        self.load_active(widgets, loader)
    }

    /// Saved workflow applied: reset now, reload once the values have settled.
    pub fn on_configure<M>(&mut self, widgets: &Widgets<M>, now: Instant) {
        self.state.reset();
        self.state.mode = read_mode(widgets);
        self.reload.schedule(now);
        log::debug!(
            "Preview reset on configure, reload in {:?}",
            self.reload.delay()
        );
    }

    /// The `source` selector changed.
    pub fn on_mode_changed<M>(
        &mut self,
        value: &str,
        widgets: &Widgets<M>,
        loader: &mut dyn ImageLoader,
        repaint: &dyn RepaintRequest,
    ) -> LoadAction {
        self.state.mode = SourceMode::from_selector(Some(value));
        self.state.cache.clear_all();
        log::debug!("Source mode switched to {}", self.state.mode);

        let action = self.load_active(widgets, loader);
        repaint.set_dirty_canvas(true, false);
        action
    }

    /// The `url` text field changed. Ignored outside URL mode.
    pub fn on_url_changed(
        &mut self,
        value: &str,
        loader: &mut dyn ImageLoader,
    ) -> Option<LoadAction> {
        if self.state.mode != SourceMode::Url {
            return None;
        }
        Some(
            self.state
                .cache
                .ensure_loaded(SourceMode::Url, Some(value), loader),
        )
    }

    /// The `image` selector changed. Ignored outside file mode.
    pub fn on_image_changed(
        &mut self,
        value: &str,
        loader: &mut dyn ImageLoader,
    ) -> Option<LoadAction> {
        if self.state.mode != SourceMode::File {
            return None;
        }
        Some(
            self.state
                .cache
                .ensure_loaded(SourceMode::File, Some(value), loader),
        )
    }

    /// Fire a due reload, then apply finished loads.
    ///
    /// Returns the number of load outcomes applied.
    pub fn tick<M>(
        &mut self,
        now: Instant,
        widgets: &Widgets<M>,
        loader: &mut dyn ImageLoader,
        repaint: &dyn RepaintRequest,
    ) -> usize {
        if self.reload.take_due(now) {
            self.state.mode = read_mode(widgets);
            log::debug!("Deferred reload in {} mode", self.state.mode);
            self.load_active(widgets, loader);
        }
        self.state.cache.poll(loader, repaint)
    }

    fn load_active<M>(&mut self, widgets: &Widgets<M>, loader: &mut dyn ImageLoader) -> LoadAction {
        let mode = self.state.mode;
        self.state
            .cache
            .ensure_loaded(mode, key_for(mode, widgets), loader)
    }
}

impl Default for SourceModeController {
    fn default() -> Self {
        Self::new(DeferredReload::DEFAULT_DELAY)
    }
}
