//! Drawing surface exposed to draw hooks.

use crate::color::Color;
use crate::geometry::{Point, Rectangle};
use crate::image::ImageHandle;

/// Horizontal anchor for [`Surface::fill_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// The subset of a 2D canvas context a node may draw with.
pub trait Surface {
    /// Draw an image scaled into `rect`.
    fn draw_image(&mut self, image: &ImageHandle, rect: Rectangle);
    fn set_fill_color(&mut self, color: Color);
    /// CSS font shorthand, e.g. `11px Arial`.
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);
    fn fill_text(&mut self, text: &str, position: Point);
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Image {
        /// Natural size of the drawn image
        natural: (u32, u32),
        rect: Rectangle,
    },
    FillColor(Color),
    Font(String),
    TextAlign(TextAlign),
    Text {
        text: String,
        position: Point,
    },
}

/// A surface that records draw calls for later replay or inspection.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Rectangles of every drawn image, in draw order.
    pub fn image_rects(&self) -> Vec<Rectangle> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Image { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    /// Every drawn text string, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for DisplayList {
    fn draw_image(&mut self, image: &ImageHandle, rect: Rectangle) {
        self.commands.push(DrawCommand::Image {
            natural: image.dimensions(),
            rect,
        });
    }

    fn set_fill_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::FillColor(color));
    }

    fn set_font(&mut self, font: &str) {
        self.commands.push(DrawCommand::Font(font.to_string()));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.commands.push(DrawCommand::TextAlign(align));
    }

    fn fill_text(&mut self, text: &str, position: Point) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
        });
    }
}
