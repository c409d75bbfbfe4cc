//! source-preview - in-node image preview for a dual-source image loader node
//!
//! A `LoadImageFileOrURL` node takes its image either from a file in the
//! editor's input directory or from a remote URL. This crate keeps the node's
//! preview in sync with whichever source is active: it loads images in the
//! background, drops results that arrive after the user moved on, resets on
//! workflow reload and draws the image fitted into the node.
//!
//! Host-side interfaces (widgets, hooks, drawing surface) come from
//! [`node_host`].

pub mod cache;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod extension;
pub mod files;
pub mod fit_box;
pub mod loader;
pub mod mode;
pub mod node;
pub mod schedule;
pub mod upload;
pub mod validate;

#[cfg(test)]
mod tests;

pub use cache::{CacheSlot, ImageCache, LoadAction};
pub use config::PreviewConfig;
pub use controller::{PreviewState, SourceModeController};
pub use error::PreviewError;
pub use extension::{PreviewEvent, PreviewExtension};
pub use mode::{SourceKey, SourceMode};
pub use node::PreviewNode;
