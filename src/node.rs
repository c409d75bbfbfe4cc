//! A preview node: the host node, its hook chains and the extension together.

use node_host::{
    ComboWidget, ImageHandle, Node, NodeHooks, RepaintRequest, Size, Surface, TextWidget,
};
use web_time::Instant;

use crate::constants::{IMAGE_WIDGET, NODE_TYPE, SOURCE_WIDGET, URL_PLACEHOLDER, URL_WIDGET};
use crate::extension::{PreviewEvent, PreviewExtension};
use crate::mode::SourceMode;

/// The `source`, `image` and `url` widgets a `LoadImageFileOrURL` node carries.
pub fn standard_node(size: Size, image_options: Vec<String>) -> Node<PreviewEvent> {
    let first = image_options.first().cloned().unwrap_or_default();

    let mut node = Node::new(NODE_TYPE, size);
    node.widgets.push(ComboWidget::new(
        SOURCE_WIDGET,
        SourceMode::selector_options(),
        SourceMode::default().as_str(),
    ));
    node.widgets
        .push(ComboWidget::new(IMAGE_WIDGET, image_options, first));
    node.widgets
        .push(TextWidget::new(URL_WIDGET, "").placeholder(URL_PLACEHOLDER));
    node
}

/// Routes host events for one node instance.
#[derive(Debug)]
pub struct PreviewNode {
    node: Node<PreviewEvent>,
    hooks: NodeHooks<PreviewExtension, PreviewEvent>,
    extension: PreviewExtension,
}

impl PreviewNode {
    /// Attach `extension` to `node`. Handlers already in `hooks` keep running first.
    pub fn new(
        node: Node<PreviewEvent>,
        mut hooks: NodeHooks<PreviewExtension, PreviewEvent>,
        extension: PreviewExtension,
    ) -> Self {
        PreviewExtension::register(&mut hooks);
        Self {
            node,
            hooks,
            extension,
        }
    }

    /// Run the created hooks.
    pub fn create(&mut self) {
        self.hooks.run_created(&mut self.extension, &mut self.node);
    }

    /// Apply a saved workflow: configure hooks first, then the saved values.
    ///
    /// Values are restored without running change handlers, the way the host
    /// does it; the preview picks them up on its deferred reload.
    pub fn configure(&mut self, saved: &[(&str, &str)]) {
        self.hooks.run_configure(&mut self.extension, &mut self.node);
        for (name, value) in saved {
            if !self.node.widgets.set_value(name, *value) {
                log::debug!("Saved value for unknown widget {:?} ignored", name);
            }
        }
    }

    /// The user edited a widget.
    pub fn edit_widget(&mut self, name: &str, value: &str) {
        for event in self.node.widgets.change(name, value) {
            self.extension.update(&mut self.node, event);
        }
    }

    /// The user pressed a button.
    pub fn click(&mut self, name: &str) {
        if let Some(event) = self.node.widgets.click(name) {
            self.extension.update(&mut self.node, event);
        }
    }

    /// Called once per host frame.
    pub fn tick(&mut self, now: Instant) -> usize {
        self.extension.tick(&mut self.node, now)
    }

    /// Run the draw-foreground hooks.
    pub fn draw(&self, surface: &mut dyn Surface) {
        self.hooks
            .run_draw_foreground(&self.extension, &self.node, surface);
    }

    pub fn resize(&mut self, size: Size) {
        self.node.set_size(size);
        self.node.canvas().set_dirty_canvas(true, false);
    }

    pub fn current_image(&self) -> Option<&ImageHandle> {
        self.extension.controller().current_image()
    }

    pub fn mode(&self) -> SourceMode {
        self.extension.controller().mode()
    }

    pub fn node(&self) -> &Node<PreviewEvent> {
        &self.node
    }

    /// Direct access for host-side setup such as attaching widget handlers.
    pub fn node_mut(&mut self) -> &mut Node<PreviewEvent> {
        &mut self.node
    }

    pub fn extension(&self) -> &PreviewExtension {
        &self.extension
    }

    pub fn extension_mut(&mut self) -> &mut PreviewExtension {
        &mut self.extension
    }
}
