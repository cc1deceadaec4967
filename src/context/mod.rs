//! Immutable, chainable request context.
//!
//! # Data Flow
//! ```text
//! ScopedContext::new()            (empty, one per request)
//!     → derive::<K>(value)        (new head node, parent shared)
//!     → derive::<K2>(value)       (another node, older contexts untouched)
//!     → get::<K>()                (walks head → root, nearest value wins)
//! ```
//!
//! # Design Decisions
//! - Each context-carried entity owns one key type; the type is its slot,
//!   so two unrelated users of the carrier can never collide on a key
//! - Modules keep their key types private and expose typed accessors
//! - Nodes are reference counted; derivation is O(1) and never copies parents
//! - Contexts are `Send + Sync` and can be read from any number of tasks

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A slot that can be stored in a [`ScopedContext`].
///
/// The implementing type itself is the key. Keep it unexported and hand out
/// accessors instead, so the slot has exactly one owner.
pub trait ContextKey: 'static {
    /// Type of the value held in this slot.
    type Value: Send + Sync + 'static;
}

struct Node {
    key: TypeId,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Node>>,
}

/// An immutable key-value carrier threaded through one request.
///
/// Cloning is cheap (one reference count). Deriving returns a new context
/// and leaves `self` exactly as it was.
#[derive(Clone, Default)]
pub struct ScopedContext {
    head: Option<Arc<Node>>,
}

impl ScopedContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a child context with `value` stored in slot `K`.
    ///
    /// A value already present for `K` in `self` is shadowed in the child only.
    pub fn derive<K: ContextKey>(&self, value: K::Value) -> Self {
        Self {
            head: Some(Arc::new(Node {
                key: TypeId::of::<K>(),
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Look up the nearest value stored in slot `K`.
    pub fn get<K: ContextKey>(&self) -> Option<&K::Value> {
        let wanted = TypeId::of::<K>();
        self.nodes()
            .find(|node| node.key == wanted)
            .and_then(|node| node.value.downcast_ref::<K::Value>())
    }

    /// Whether slot `K` holds a value.
    pub fn contains<K: ContextKey>(&self) -> bool {
        self.get::<K>().is_some()
    }

    /// Number of derivations between this context and the empty root.
    pub fn depth(&self) -> usize {
        self.nodes().count()
    }

    /// Whether nothing has been derived into this context.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    fn nodes(&self) -> impl Iterator<Item = &Node> {
        std::iter::successors(self.head.as_deref(), |node| node.parent.as_deref())
    }
}

impl fmt::Debug for ScopedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedContext")
            .field("depth", &self.depth())
            .finish()
    }
}

// Long chains would otherwise drop recursively through `parent`.
impl Drop for Node {
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut owned) => next = owned.parent.take(),
                Err(_) => break,
            }
        }
    }
}
