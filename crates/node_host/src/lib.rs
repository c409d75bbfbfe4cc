//! node_host - interfaces of the node-graph editor that hosts node extensions
//!
//! A node extension never talks to the editor directly. It sees the node's
//! widgets, the lifecycle hook chains, a repaint request and a drawing surface.
//! This crate defines those seams and ships small in-memory implementations of
//! each so extensions can be driven headless.

mod callback;
mod color;
mod geometry;
mod hooks;
mod image;
mod node;
mod surface;
mod widget;

pub use callback::{Callback, Callback0, CallbackChain};
pub use color::Color;
pub use geometry::{Point, Rectangle, Size};
pub use hooks::{HookKind, NodeHooks};
pub use image::ImageHandle;
pub use node::{CanvasFlags, Node, RepaintRequest};
pub use surface::{DisplayList, DrawCommand, Surface, TextAlign};
pub use widget::{ButtonWidget, ComboWidget, TextWidget, Widget, Widgets};
