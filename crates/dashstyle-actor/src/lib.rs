//! Actor tree and stylable capability for the dashstyle engine.
//!
//! This crate provides an arena-based tree of UI objects ("actors") together
//! with the [`Stylable`] trait the style cascade works against.
//!
//! # Design
//!
//! The tree uses arena allocation with [`ActorId`] indices for all relationships.
//! Parent links are plain indices: looking a parent up never owns or frees it.
//! Not every node has to be stylable; plain container nodes are skipped when
//! the cascade walks up to find a stylable parent.

/// Generic stylable actor with declared properties and change notification.
pub mod actor;
/// Ordered class and pseudo-class sets.
pub mod class_set;
/// The [`Stylable`] capability trait.
pub mod stylable;
/// Property declarations and typed values.
pub mod value;

pub use actor::Actor;
pub use class_set::{CLASS_SEPARATOR, PSEUDO_CLASS_SEPARATOR, StyleClassSet};
pub use stylable::Stylable;
pub use value::{ColorValue, PropertySpec, PropertyValue, ValueType};

use std::collections::HashSet;

/// Upper bound on parent links followed when walking towards the stage.
///
/// Real trees are far shallower; hitting the bound means the parent chain is
/// corrupted and the walk gives up.
pub const MAX_ANCESTOR_DEPTH: usize = 64;

/// A type-safe index into the actor tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub usize);

impl ActorId {
    /// The root container (the stage) is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// One slot of the arena.
#[derive(Debug)]
pub struct Node {
    /// The stylable object, or `None` for a plain container.
    pub stylable: Option<Box<dyn Stylable>>,

    /// Parent node, `None` for the root and for detached nodes.
    pub parent: Option<ActorId>,

    /// Children in paint order.
    pub children: Vec<ActorId>,
}

/// Arena-based actor tree with O(1) node access and parent lookup.
#[derive(Debug)]
pub struct ActorTree {
    /// All nodes, indexed by `ActorId`. The stage is always at `ActorId::ROOT`.
    nodes: Vec<Node>,
}

impl ActorTree {
    /// Create a tree holding only the (non-stylable) stage container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                stylable: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Get the stage ID.
    #[must_use]
    pub const fn root(&self) -> ActorId {
        ActorId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: ActorId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of nodes, including the stage.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the stage is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached stylable node.
    pub fn alloc(&mut self, stylable: impl Stylable + 'static) -> ActorId {
        self.alloc_node(Some(Box::new(stylable)))
    }

    /// Allocate a detached stylable node from an already boxed object.
    pub fn alloc_boxed(&mut self, stylable: Box<dyn Stylable>) -> ActorId {
        self.alloc_node(Some(stylable))
    }

    /// Allocate a detached container that does not take part in styling.
    pub fn alloc_container(&mut self) -> ActorId {
        self.alloc_node(None)
    }

    fn alloc_node(&mut self, stylable: Option<Box<dyn Stylable>>) -> ActorId {
        let id = ActorId(self.nodes.len());
        self.nodes.push(Node {
            stylable,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// A child that already has a parent is detached from it first.
    ///
    /// # Panics
    /// Panics if either ID was not allocated by this tree.
    pub fn append_child(&mut self, parent: ActorId, child: ActorId) {
        if let Some(old_parent) = self.nodes[child.0].parent {
            self.nodes[old_parent.0].children.retain(|&c| c != child);
        }
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Detach `child` from its parent. No-op for detached nodes.
    pub fn remove_from_parent(&mut self, child: ActorId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        self.nodes[parent.0].children.retain(|&c| c != child);
        self.nodes[child.0].parent = None;
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: ActorId) -> Option<ActorId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: ActorId) -> &[ActorId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Iterate over all ancestors of a node, from parent to root.
    ///
    /// The iterator follows parent links blindly; callers that must survive a
    /// corrupted (cyclic) tree bound it with `take`.
    #[must_use]
    pub fn ancestors(&self, id: ActorId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over ancestors that are stylable, nearest first.
    ///
    /// At most [`MAX_ANCESTOR_DEPTH`] parent links are followed.
    pub fn stylable_ancestors(&self, id: ActorId) -> impl Iterator<Item = ActorId> + '_ {
        self.ancestors(id)
            .take(MAX_ANCESTOR_DEPTH)
            .filter(|&a| self.stylable(a).is_some())
    }

    /// Nearest ancestor that is stylable.
    #[must_use]
    pub fn stylable_parent(&self, id: ActorId) -> Option<ActorId> {
        self.stylable_ancestors(id).next()
    }

    /// Get the stylable object of a node.
    #[must_use]
    pub fn stylable(&self, id: ActorId) -> Option<&dyn Stylable> {
        self.get(id).and_then(|n| n.stylable.as_deref())
    }

    /// Get the stylable object of a node mutably.
    pub fn stylable_mut(&mut self, id: ActorId) -> Option<&mut (dyn Stylable + 'static)> {
        self.nodes
            .get_mut(id.0)
            .and_then(|n| n.stylable.as_deref_mut())
    }

    /// `id` and all nodes below it in pre-order (parents before children).
    ///
    /// Each node is visited at most once even if the tree has been corrupted
    /// into a cycle.
    #[must_use]
    pub fn descendants(&self, id: ActorId) -> Vec<ActorId> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if self.get(current).is_none() || !seen.insert(current) {
                continue;
            }
            order.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        order
    }

    /// First stylable node (in pre-order) whose name is `name`.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<ActorId> {
        self.descendants(ActorId::ROOT)
            .into_iter()
            .find(|&id| self.stylable(id).and_then(|s| s.name()) == Some(name))
    }
}

impl Default for ActorTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
#[derive(Debug)]
pub struct AncestorIterator<'a> {
    tree: &'a ActorTree,
    current: Option<ActorId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = ActorId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}
