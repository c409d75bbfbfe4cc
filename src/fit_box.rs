//! Fitting the preview image into the node and drawing it.

use node_host::{ImageHandle, Point, Rectangle, Size, Surface, TextAlign};

use crate::config::LayoutConfig;

/// Display size of an image after fitting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitBox {
    pub width: f32,
    pub height: f32,
}

/// Shrink `(image_w, image_h)` into the available box, keeping aspect ratio.
///
/// Width is clamped first, then height on the already scaled size. Images
/// smaller than the box keep their natural size.
pub fn fit_box(image_w: f32, image_h: f32, avail_w: f32, avail_h: f32) -> FitBox {
    let mut width = image_w;
    let mut height = image_h;

    if width > avail_w {
        let scale = avail_w / width;
        width *= scale;
        height *= scale;
    }
    if height > avail_h {
        let scale = avail_h / height;
        width *= scale;
        height *= scale;
    }

    FitBox { width, height }
}

/// Caption text for an image's natural dimensions.
pub fn caption(width: u32, height: u32) -> String {
    format!("{} x {}", width, height)
}

/// Where the preview and its caption go inside a node.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewLayout {
    pub rect: Rectangle,
    pub caption: String,
    pub caption_position: Point,
}

impl PreviewLayout {
    /// Lay out an image of natural size `image_size` in a node of `node_size`.
    pub fn compute(image_size: (u32, u32), node_size: Size, config: &LayoutConfig) -> Self {
        let (image_w, image_h) = image_size;
        let y = config.top_margin;
        let avail_w = (node_size.width - config.side_padding).max(0.0);
        let avail_h = (node_size.height - y - config.caption_margin).max(config.min_height);

        let fitted = fit_box(image_w as f32, image_h as f32, avail_w, avail_h);
        let x = (node_size.width - fitted.width) / 2.0;

        Self {
            rect: Rectangle::new(x, y, fitted.width, fitted.height),
            caption: caption(image_w, image_h),
            caption_position: Point::new(
                node_size.width / 2.0,
                y + fitted.height + config.caption_offset,
            ),
        }
    }
}

/// Draw `image` and its size caption onto `surface`.
///
/// Nothing is drawn when the fitted box has no area.
pub fn draw_preview(
    image: &ImageHandle,
    node_size: Size,
    config: &LayoutConfig,
    surface: &mut dyn Surface,
) {
    let layout = PreviewLayout::compute(image.dimensions(), node_size, config);
    if layout.rect.is_empty() {
        log::trace!("Preview box empty, skipping draw");
        return;
    }

    surface.draw_image(image, layout.rect);
    surface.set_fill_color(config.caption_color());
    surface.set_font(&config.caption_font);
    surface.set_text_align(TextAlign::Center);
    surface.fill_text(&layout.caption, layout.caption_position);
}

#[cfg(test)]
mod tests {
    use node_host::{Color, DisplayList, DrawCommand};

    use super::*;

    fn image(width: u32, height: u32) -> ImageHandle {
        ImageHandle::from_rgba8(vec![0; (width * height * 4) as usize], width, height).unwrap()
    }

    #[test]
    fn test_small_image_keeps_natural_size() {
        assert_eq!(
            fit_box(100.0, 50.0, 400.0, 300.0),
            FitBox {
                width: 100.0,
                height: 50.0
            }
        );
    }

    #[test]
    fn test_width_bound() {
        let fitted = fit_box(800.0, 100.0, 400.0, 500.0);
        assert_eq!(fitted.width, 400.0);
        assert_eq!(fitted.height, 50.0);
    }

    #[test]
    fn test_height_bound_after_width_pass() {
        let fitted = fit_box(100.0, 800.0, 400.0, 300.0);
        assert_eq!(fitted.width, 37.5);
        assert_eq!(fitted.height, 300.0);
    }

    #[test]
    fn test_both_passes_apply() {
        let fitted = fit_box(1000.0, 1000.0, 500.0, 250.0);
        assert_eq!(fitted.width, 250.0);
        assert_eq!(fitted.height, 250.0);
    }

    #[test]
    fn test_layout_centers_in_node() {
        let config = LayoutConfig::default();
        // avail_w = 400, avail_h = 685 - 160 - 25 = 500
        let layout = PreviewLayout::compute((800, 100), Size::new(420.0, 685.0), &config);
        assert_eq!(layout.rect, Rectangle::new(10.0, 160.0, 400.0, 50.0));
        assert_eq!(layout.caption, "800 x 100");
        assert_eq!(layout.caption_position, Point::new(210.0, 225.0));
    }

    #[test]
    fn test_short_node_uses_min_height() {
        let config = LayoutConfig::default();
        let layout = PreviewLayout::compute((100, 100), Size::new(300.0, 100.0), &config);
        assert_eq!(layout.rect.height, 50.0);
        assert_eq!(layout.rect.width, 50.0);
    }

    #[test]
    fn test_draw_emits_image_then_caption() {
        let config = LayoutConfig::default();
        let mut list = DisplayList::new();
        draw_preview(&image(40, 20), Size::new(300.0, 400.0), &config, &mut list);

        let commands = list.commands();
        assert_eq!(commands.len(), 5);
        assert!(matches!(
            commands[0],
            DrawCommand::Image {
                natural: (40, 20),
                ..
            }
        ));
        assert_eq!(
            commands[1],
            DrawCommand::FillColor(Color::from_hex("#aaa").unwrap())
        );
        assert_eq!(commands[2], DrawCommand::Font("11px Arial".to_string()));
        assert_eq!(commands[3], DrawCommand::TextAlign(TextAlign::Center));
        assert_eq!(list.texts(), vec!["40 x 20"]);
    }

    #[test]
    fn test_narrow_node_draws_nothing() {
        let config = LayoutConfig::default();
        let mut list = DisplayList::new();
        draw_preview(&image(40, 20), Size::new(10.0, 400.0), &config, &mut list);
        assert!(list.is_empty());
    }
}
