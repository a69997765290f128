//! Generic ordered multi-child tree used for all navigation views.
//!
//! Tree nodes live behind [`TreeRef`] (`Rc<RefCell<_>>`) handles because the
//! walk algorithms share and splice subtrees: an ancestor chain's leaf set
//! holds the same nodes that appear inside its root trees, and the view layer
//! grafts children onto those leaves after the walk returns. Identity (not
//! value) comparison via [`TreeRef::same`] is what the deduplication rules of
//! the traversal layer are defined over.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Aggregate counts over one subtree, cached until the next child addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Aggregates {
    descendants: usize,
    leaves: usize,
}

#[derive(Debug)]
pub struct Tree<T> {
    value: T,
    children: Vec<TreeRef<T>>,
    aggregates: Cell<Option<Aggregates>>,
}

/// Shared handle to a tree node. Cloning the handle never clones the subtree.
#[derive(Debug)]
pub struct TreeRef<T>(Rc<RefCell<Tree<T>>>);

impl<T> Clone for TreeRef<T> {
    fn clone(&self) -> Self {
        TreeRef(Rc::clone(&self.0))
    }
}

impl<T> TreeRef<T> {
    pub fn new(value: T) -> Self {
        TreeRef(Rc::new(RefCell::new(Tree {
            value,
            children: Vec::new(),
            aggregates: Cell::new(None),
        })))
    }

    /// Object identity: two handles naming the same underlying node.
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Append a child, invalidating this node's cached counts.
    pub fn add_child(&self, child: TreeRef<T>) {
        let mut inner = self.0.borrow_mut();
        inner.children.push(child);
        inner.aggregates.set(None);
    }

    pub fn children(&self) -> Vec<TreeRef<T>> {
        self.0.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.0.borrow().children.is_empty()
    }

    /// Borrow the payload for the duration of `f`.
    pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow().value)
    }

    /// Number of nodes below this one (excluding it).
    pub fn descendant_count(&self) -> usize {
        self.aggregates().descendants
    }

    /// Number of leaf nodes in this subtree (at least one).
    pub fn leaf_count(&self) -> usize {
        self.aggregates().leaves
    }

    fn aggregates(&self) -> Aggregates {
        if let Some(cached) = self.0.borrow().aggregates.get() {
            return cached;
        }
        let mut descendants = 0;
        let mut leaves = 0;
        for node in self.iter_pre_order() {
            if !node.same(self) {
                descendants += 1;
            }
            if node.is_leaf() {
                leaves += 1;
            }
        }
        let computed = Aggregates {
            descendants,
            leaves,
        };
        self.0.borrow().aggregates.set(Some(computed));
        computed
    }

    /// Lazy pre-order traversal. Each call starts a fresh sequence.
    pub fn iter_pre_order(&self) -> PreOrder<T> {
        PreOrder {
            stack: vec![self.clone()],
        }
    }

    /// Lazy post-order traversal. Each call starts a fresh sequence.
    pub fn iter_post_order(&self) -> PostOrder<T> {
        PostOrder {
            stack: vec![(self.clone(), false)],
        }
    }
}

impl<T: Clone> TreeRef<T> {
    pub fn value(&self) -> T {
        self.0.borrow().value.clone()
    }
}

impl<T: PartialEq> TreeRef<T> {
    pub fn find_child(&self, value: &T) -> Option<TreeRef<T>> {
        self.0
            .borrow()
            .children
            .iter()
            .find(|c| c.0.borrow().value == *value)
            .cloned()
    }

    /// Return the existing child whose payload equals `value`, creating and
    /// appending a new one if none exists.
    pub fn ensure_child(&self, value: T) -> TreeRef<T> {
        if let Some(existing) = self.find_child(&value) {
            return existing;
        }
        let child = TreeRef::new(value);
        self.add_child(child.clone());
        child
    }
}

pub struct PreOrder<T> {
    stack: Vec<TreeRef<T>>,
}

impl<T> Iterator for PreOrder<T> {
    type Item = TreeRef<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let children = node.children();
        self.stack.extend(children.into_iter().rev());
        Some(node)
    }
}

pub struct PostOrder<T> {
    // (node, children already expanded)
    stack: Vec<(TreeRef<T>, bool)>,
}

impl<T> Iterator for PostOrder<T> {
    type Item = TreeRef<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, expanded)) = self.stack.pop() {
            if expanded {
                return Some(node);
            }
            let children = node.children();
            self.stack.push((node, true));
            self.stack
                .extend(children.into_iter().rev().map(|c| (c, false)));
        }
        None
    }
}
