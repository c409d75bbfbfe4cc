//! Node widgets and lookup by name.
//!
//! Values set through [`Widgets::set_value`] are silent, the way the host
//! restores persisted values. Values set through [`Widgets::change`] model a
//! user edit: the value is stored and then the widget's callback chain runs.

use crate::callback::{Callback0, CallbackChain};

/// Drop-down selector with a fixed option list.
#[derive(Debug)]
pub struct ComboWidget<M> {
    name: String,
    options: Vec<String>,
    value: String,
    on_change: CallbackChain<String, M>,
}

impl<M> ComboWidget<M> {
    pub fn new(name: impl Into<String>, options: Vec<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options,
            value: value.into(),
            on_change: CallbackChain::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Insert an option if absent and keep the list sorted.
    ///
    /// Returns `true` if the option was added.
    pub fn insert_option_sorted(&mut self, option: &str) -> bool {
        if self.has_option(option) {
            return false;
        }
        self.options.push(option.to_string());
        self.options.sort();
        true
    }

    pub fn set_options(&mut self, options: Vec<String>) {
        self.options = options;
    }

    pub fn on_change_mut(&mut self) -> &mut CallbackChain<String, M> {
        &mut self.on_change
    }
}

/// Single-line text field.
#[derive(Debug)]
pub struct TextWidget<M> {
    name: String,
    value: String,
    placeholder: String,
    on_change: CallbackChain<String, M>,
}

impl<M> TextWidget<M> {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            placeholder: String::new(),
            on_change: CallbackChain::new(),
        }
    }

    /// Set the hint shown while the field is empty.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn placeholder_text(&self) -> &str {
        &self.placeholder
    }

    pub fn on_change_mut(&mut self) -> &mut CallbackChain<String, M> {
        &mut self.on_change
    }
}

/// Push button; its name doubles as its label.
#[derive(Debug)]
pub struct ButtonWidget<M> {
    name: String,
    on_click: Callback0<M>,
}

impl<M> ButtonWidget<M> {
    pub fn new<F>(name: impl Into<String>, on_click: F) -> Self
    where
        F: Fn(()) -> M + 'static,
    {
        Self {
            name: name.into(),
            on_click: Callback0::new(on_click),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Any widget a node can carry.
#[derive(Debug)]
pub enum Widget<M> {
    Combo(ComboWidget<M>),
    Text(TextWidget<M>),
    Button(ButtonWidget<M>),
}

impl<M> Widget<M> {
    pub fn name(&self) -> &str {
        match self {
            Widget::Combo(w) => w.name(),
            Widget::Text(w) => w.name(),
            Widget::Button(w) => w.name(),
        }
    }

    /// Current value; buttons have none.
    pub fn value(&self) -> Option<&str> {
        match self {
            Widget::Combo(w) => Some(w.value()),
            Widget::Text(w) => Some(w.value()),
            Widget::Button(_) => None,
        }
    }
}

impl<M> From<ComboWidget<M>> for Widget<M> {
    fn from(widget: ComboWidget<M>) -> Self {
        Widget::Combo(widget)
    }
}

impl<M> From<TextWidget<M>> for Widget<M> {
    fn from(widget: TextWidget<M>) -> Self {
        Widget::Text(widget)
    }
}

impl<M> From<ButtonWidget<M>> for Widget<M> {
    fn from(widget: ButtonWidget<M>) -> Self {
        Widget::Button(widget)
    }
}

/// The ordered widget list of a node.
#[derive(Debug)]
pub struct Widgets<M> {
    items: Vec<Widget<M>>,
}

impl<M> Widgets<M> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a widget. A widget with an existing name is not added twice.
    pub fn push(&mut self, widget: impl Into<Widget<M>>) -> bool {
        let widget = widget.into();
        if self.find(widget.name()).is_some() {
            log::warn!("Widget {:?} already exists on node", widget.name());
            return false;
        }
        self.items.push(widget);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Widget<M>> {
        self.items.iter()
    }

    pub fn find(&self, name: &str) -> Option<&Widget<M>> {
        self.items.iter().find(|w| w.name() == name)
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut Widget<M>> {
        self.items.iter_mut().find(|w| w.name() == name)
    }

    pub fn combo(&self, name: &str) -> Option<&ComboWidget<M>> {
        match self.find(name) {
            Some(Widget::Combo(w)) => Some(w),
            _ => None,
        }
    }

    pub fn combo_mut(&mut self, name: &str) -> Option<&mut ComboWidget<M>> {
        match self.find_mut(name) {
            Some(Widget::Combo(w)) => Some(w),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&TextWidget<M>> {
        match self.find(name) {
            Some(Widget::Text(w)) => Some(w),
            _ => None,
        }
    }

    pub fn text_mut(&mut self, name: &str) -> Option<&mut TextWidget<M>> {
        match self.find_mut(name) {
            Some(Widget::Text(w)) => Some(w),
            _ => None,
        }
    }

    /// Read a widget value by name.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.find(name).and_then(Widget::value)
    }

    /// Store a value without running any callback.
    ///
    /// Returns `false` if there is no valued widget with that name.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.find_mut(name) {
            Some(Widget::Combo(w)) => {
                w.value = value.into();
                true
            }
            Some(Widget::Text(w)) => {
                w.value = value.into();
                true
            }
            _ => false,
        }
    }

    /// Store a value and run the widget's callback chain.
    ///
    /// Returns the messages produced by the chain, in handler order.
    pub fn change(&mut self, name: &str, value: impl Into<String>) -> Vec<M> {
        let value = value.into();
        match self.find_mut(name) {
            Some(Widget::Combo(w)) => {
                w.value = value;
                w.on_change.emit(&w.value)
            }
            Some(Widget::Text(w)) => {
                w.value = value;
                w.on_change.emit(&w.value)
            }
            _ => {
                log::debug!("No valued widget named {:?}", name);
                Vec::new()
            }
        }
    }

    /// Run the widget's callback chain with its current value.
    pub fn fire(&self, name: &str) -> Vec<M> {
        match self.find(name) {
            Some(Widget::Combo(w)) => w.on_change.emit(&w.value),
            Some(Widget::Text(w)) => w.on_change.emit(&w.value),
            _ => Vec::new(),
        }
    }

    /// Press a button.
    pub fn click(&self, name: &str) -> Option<M> {
        match self.find(name) {
            Some(Widget::Button(w)) => w.on_click.emit(),
            _ => None,
        }
    }
}

impl<M> Default for Widgets<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widgets() -> Widgets<String> {
        let mut widgets = Widgets::new();
        widgets.push(ComboWidget::new(
            "image",
            vec!["a.png".to_string(), "c.png".to_string()],
            "a.png",
        ));
        widgets.push(TextWidget::new("url", "").placeholder("https://example.com/image.png"));
        widgets.push(ButtonWidget::new("upload", |()| "clicked".to_string()));
        widgets
    }

    #[test]
    fn test_lookup_by_name() {
        let widgets = widgets();
        assert_eq!(widgets.value("image"), Some("a.png"));
        assert_eq!(widgets.value("url"), Some(""));
        assert_eq!(widgets.value("upload"), None);
        assert!(widgets.combo("url").is_none());
        assert!(widgets.text("url").is_some());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut widgets = widgets();
        assert!(!widgets.push(TextWidget::new("url", "x")));
        assert_eq!(widgets.len(), 3);
    }

    #[test]
    fn test_set_value_is_silent() {
        let mut widgets = widgets();
        widgets
            .text_mut("url")
            .unwrap()
            .on_change_mut()
            .push(|v: &String| Some(v.clone()));

        assert!(widgets.set_value("url", "http://x/y.png"));
        assert_eq!(widgets.value("url"), Some("http://x/y.png"));
        assert_eq!(widgets.fire("url"), vec!["http://x/y.png".to_string()]);
    }

    #[test]
    fn test_change_runs_chain() {
        let mut widgets = widgets();
        widgets
            .combo_mut("image")
            .unwrap()
            .on_change_mut()
            .push(|v: &String| Some(format!("changed:{v}")));

        let messages = widgets.change("image", "c.png");
        assert_eq!(messages, vec!["changed:c.png".to_string()]);
        assert_eq!(widgets.value("image"), Some("c.png"));
    }

    #[test]
    fn test_insert_option_sorted() {
        let mut widgets = widgets();
        let combo = widgets.combo_mut("image").unwrap();
        assert!(combo.insert_option_sorted("b.png"));
        assert!(!combo.insert_option_sorted("b.png"));
        assert_eq!(combo.options(), &["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_click_button() {
        let widgets = widgets();
        assert_eq!(widgets.click("upload"), Some("clicked".to_string()));
        assert_eq!(widgets.click("image"), None);
    }
}
