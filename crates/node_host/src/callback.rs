//! Callback abstraction for widget event handlers
//!
//! Widgets in the host editor carry change handlers that other parties may
//! have attached before an extension gets to see the node. Rather than
//! patching a single late-bound function, every widget keeps an ordered
//! [`CallbackChain`]: handlers registered earlier always run first, so the
//! host's own side effects (persisting a value, marking the graph dirty)
//! happen before an extension reacts.
//!
//! # Examples
//!
//! ```
//! use node_host::CallbackChain;
//!
//! #[derive(Debug, PartialEq)]
//! enum Message {
//!     Changed(String),
//! }
//!
//! let mut chain: CallbackChain<String, Message> = CallbackChain::new();
//! chain.push(|_value: &String| None); // host side effect, no message
//! chain.push(|value: &String| Some(Message::Changed(value.clone())));
//!
//! let messages = chain.emit(&"a.png".to_string());
//! assert_eq!(messages, vec![Message::Changed("a.png".into())]);
//! ```

use std::fmt;

/// A callback wrapper that encapsulates an optional event handler.
///
/// # Type Parameters
///
/// - `T`: The input type for the callback
/// - `M`: The message type returned by the callback
pub struct Callback<T, M> {
    f: Option<Box<dyn Fn(T) -> M>>,
}

impl<T, M> Callback<T, M> {
    /// Create a new callback from a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(T) -> M + 'static,
    {
        Self {
            f: Some(Box::new(f)),
        }
    }

    /// Create an empty callback (no handler).
    pub fn none() -> Self {
        Self { f: None }
    }

    /// Call the callback with a value, if it exists.
    ///
    /// Returns `Some(message)` if the callback is set, or `None` if no callback is registered.
    pub fn call(&self, value: T) -> Option<M> {
        self.f.as_ref().map(|f| f(value))
    }

    /// Check if the callback is set.
    pub fn is_some(&self) -> bool {
        self.f.is_some()
    }

    /// Check if the callback is not set.
    pub fn is_none(&self) -> bool {
        self.f.is_none()
    }
}

impl<T, M> Default for Callback<T, M> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T, M> fmt::Debug for Callback<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("set", &self.is_some())
            .finish()
    }
}

/// A callback that takes no parameters, used for button clicks.
pub type Callback0<M> = Callback<(), M>;

impl<M> Callback0<M> {
    /// Call the callback without any parameters.
    pub fn emit(&self) -> Option<M> {
        self.call(())
    }
}

// =============================================================================
// Ordered handler chain
// =============================================================================

type ChainHandler<T, M> = Box<dyn Fn(&T) -> Option<M>>;

/// An ordered list of change handlers.
///
/// Each handler sees the new value and may produce a message. Handlers that
/// only perform side effects return `None`. [`emit`](Self::emit) runs every
/// handler in registration order and collects the produced messages.
pub struct CallbackChain<T, M> {
    handlers: Vec<ChainHandler<T, M>>,
}

impl<T, M> CallbackChain<T, M> {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Append a handler. It runs after every handler already in the chain.
    pub fn push<F>(&mut self, handler: F)
    where
        F: Fn(&T) -> Option<M> + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    /// Run all handlers in order, collecting the messages they produce.
    pub fn emit(&self, value: &T) -> Vec<M> {
        self.handlers
            .iter()
            .filter_map(|handler| handler(value))
            .collect()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<T, M> Default for CallbackChain<T, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, M> fmt::Debug for CallbackChain<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackChain")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
