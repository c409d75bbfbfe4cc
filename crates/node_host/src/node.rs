//! A node instance as the host exposes it to extensions.

use std::cell::Cell;

use crate::geometry::Size;
use crate::widget::Widgets;

/// Mark the canvas dirty so the host repaints on its next frame.
///
/// `foreground` repaints node contents; `background` forces the host to
/// re-lay out the graph as well. Preview updates only need the foreground.
pub trait RepaintRequest {
    fn set_dirty_canvas(&self, foreground: bool, background: bool);
}

/// Dirty flags the host reads once per frame.
#[derive(Debug, Default)]
pub struct CanvasFlags {
    foreground: Cell<bool>,
    background: Cell<bool>,
}

impl CanvasFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and reset the flags as `(foreground, background)`.
    pub fn take(&self) -> (bool, bool) {
        (self.foreground.take(), self.background.take())
    }

    pub fn is_dirty(&self) -> bool {
        self.foreground.get() || self.background.get()
    }
}

impl RepaintRequest for CanvasFlags {
    fn set_dirty_canvas(&self, foreground: bool, background: bool) {
        if foreground {
            self.foreground.set(true);
        }
        if background {
            self.background.set(true);
        }
    }
}

/// A node: its type, size on the canvas, widgets and repaint flags.
#[derive(Debug)]
pub struct Node<M> {
    type_name: String,
    size: Size,
    pub widgets: Widgets<M>,
    canvas: CanvasFlags,
}

impl<M> Node<M> {
    pub fn new(type_name: impl Into<String>, size: Size) -> Self {
        Self {
            type_name: type_name.into(),
            size,
            widgets: Widgets::new(),
            canvas: CanvasFlags::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn canvas(&self) -> &CanvasFlags {
        &self.canvas
    }
}

impl<M> RepaintRequest for Node<M> {
    fn set_dirty_canvas(&self, foreground: bool, background: bool) {
        self.canvas.set_dirty_canvas(foreground, background);
    }
}
