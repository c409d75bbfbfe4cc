//! Lifecycle hook chains.
//!
//! Each hook kind keeps an ordered list of handlers. An extension appends its
//! handlers at registration time; handlers that were there before it (the
//! host's own, or another extension's) keep running first. Per-node state is
//! passed in explicitly as `&mut S` instead of living in captured closures.

use crate::node::Node;
use crate::surface::Surface;

/// The lifecycle points a node exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// The node was instantiated; widget values are final.
    Created,
    /// A saved workflow is being applied to the node.
    Configure,
    /// The node's foreground is being painted.
    DrawForeground,
}

type LifecycleHandler<S, M> = Box<dyn Fn(&mut S, &mut Node<M>)>;
type DrawHandler<S, M> = Box<dyn Fn(&S, &Node<M>, &mut dyn Surface)>;

/// Ordered handler lists for every [`HookKind`].
pub struct NodeHooks<S, M> {
    created: Vec<LifecycleHandler<S, M>>,
    configure: Vec<LifecycleHandler<S, M>>,
    draw_foreground: Vec<DrawHandler<S, M>>,
}

impl<S, M> NodeHooks<S, M> {
    pub fn new() -> Self {
        Self {
            created: Vec::new(),
            configure: Vec::new(),
            draw_foreground: Vec::new(),
        }
    }

    pub fn on_created<F>(&mut self, handler: F)
    where
        F: Fn(&mut S, &mut Node<M>) + 'static,
    {
        self.created.push(Box::new(handler));
    }

    pub fn on_configure<F>(&mut self, handler: F)
    where
        F: Fn(&mut S, &mut Node<M>) + 'static,
    {
        self.configure.push(Box::new(handler));
    }

    pub fn on_draw_foreground<F>(&mut self, handler: F)
    where
        F: Fn(&S, &Node<M>, &mut dyn Surface) + 'static,
    {
        self.draw_foreground.push(Box::new(handler));
    }

    pub fn run_created(&self, state: &mut S, node: &mut Node<M>) {
        log::trace!("Running {} created handlers", self.created.len());
        for handler in &self.created {
            handler(state, node);
        }
    }

    pub fn run_configure(&self, state: &mut S, node: &mut Node<M>) {
        log::trace!("Running {} configure handlers", self.configure.len());
        for handler in &self.configure {
            handler(state, node);
        }
    }

    pub fn run_draw_foreground(&self, state: &S, node: &Node<M>, surface: &mut dyn Surface) {
        for handler in &self.draw_foreground {
            handler(state, node, surface);
        }
    }

    /// Number of handlers registered for a hook kind.
    pub fn len(&self, kind: HookKind) -> usize {
        match kind {
            HookKind::Created => self.created.len(),
            HookKind::Configure => self.configure.len(),
            HookKind::DrawForeground => self.draw_foreground.len(),
        }
    }
}

impl<S, M> Default for NodeHooks<S, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, M> std::fmt::Debug for NodeHooks<S, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeHooks")
            .field("created", &self.created.len())
            .field("configure", &self.configure.len())
            .field("draw_foreground", &self.draw_foreground.len())
            .finish()
    }
}
