// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene nodes and child-list mutation.

use core::fmt;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::graphics::Graphics;
use crate::text::TextContent;
use crate::SceneError;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique node identity, assigned at construction.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl NodeId {
    fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node draws.
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    /// Pure grouping node; draws nothing itself.
    Empty,
    /// Vector graphics.
    Graphics(Graphics),
    /// A run of text.
    Text(TextContent),
}

impl Content {
    fn label(&self) -> &'static str {
        match self {
            Self::Empty => "group",
            Self::Graphics(_) => "graphics",
            Self::Text(_) => "text",
        }
    }
}

struct NodeState {
    position: [f32; 2],
    alpha: f32,
    visible: bool,
    content: Content,
    children: Vec<SceneNode>,
    parent: Weak<NodeInner>,
}

struct NodeInner {
    id: NodeId,
    state: RefCell<NodeState>,
}

/// Handle to a live scene node.
///
/// Clones share the same node. Equality is identity.
#[derive(Clone)]
pub struct SceneNode(Rc<NodeInner>);

impl SceneNode {
    /// Create a detached node with the given content.
    pub fn new(content: Content) -> Self {
        Self(Rc::new(NodeInner {
            id: NodeId::next(),
            state: RefCell::new(NodeState {
                position: [0.0, 0.0],
                alpha: 1.0,
                visible: true,
                content,
                children: Vec::new(),
                parent: Weak::new(),
            }),
        }))
    }

    /// Create a detached grouping node.
    pub fn group() -> Self {
        Self::new(Content::Empty)
    }

    /// Node identity.
    pub fn id(&self) -> NodeId {
        self.0.id
    }

    /// Whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Current parent, if attached.
    pub fn parent(&self) -> Option<Self> {
        self.0.state.borrow().parent.upgrade().map(Self)
    }

    /// Snapshot of the child list in paint order.
    pub fn children(&self) -> Vec<Self> {
        self.0.state.borrow().children.clone()
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.0.state.borrow().children.len()
    }

    /// Position of `child` among this node's children.
    pub fn index_of(&self, child: &Self) -> Option<usize> {
        self.0
            .state
            .borrow()
            .children
            .iter()
            .position(|c| c.ptr_eq(child))
    }

    /// Append `child`, detaching it from any previous parent first.
    ///
    /// Re-adding a current child moves it to the end.
    pub fn add_child(&self, child: &Self) -> Result<(), SceneError> {
        self.check_cycle(child)?;
        child.detach();
        self.0.state.borrow_mut().children.push(child.clone());
        child.set_parent(self);
        Ok(())
    }

    /// Insert `child` immediately before `before`.
    ///
    /// `before` must already be a child of this node. When `child` is also a
    /// child it is moved, never duplicated.
    pub fn insert_before(&self, child: &Self, before: &Self) -> Result<(), SceneError> {
        if child.ptr_eq(before) {
            return match self.index_of(before) {
                Some(_) => Ok(()),
                None => Err(self.not_a_child(before)),
            };
        }
        if self.index_of(before).is_none() {
            return Err(self.not_a_child(before));
        }
        self.check_cycle(child)?;
        child.detach();
        let index = self.index_of(before).ok_or_else(|| self.not_a_child(before))?;
        self.0
            .state
            .borrow_mut()
            .children
            .insert(index, child.clone());
        child.set_parent(self);
        Ok(())
    }

    /// Detach `child` from this node.
    pub fn remove_child(&self, child: &Self) -> Result<(), SceneError> {
        let index = self.index_of(child).ok_or_else(|| self.not_a_child(child))?;
        self.0.state.borrow_mut().children.remove(index);
        child.0.state.borrow_mut().parent = Weak::new();
        Ok(())
    }

    /// Detach every child in one step, returning them in paint order.
    pub fn remove_children(&self) -> Vec<Self> {
        let removed = core::mem::take(&mut self.0.state.borrow_mut().children);
        for child in &removed {
            child.0.state.borrow_mut().parent = Weak::new();
        }
        removed
    }

    /// Local position.
    pub fn position(&self) -> [f32; 2] {
        self.0.state.borrow().position
    }

    /// Move the node in its parent's space.
    pub fn set_position(&self, x: f32, y: f32) {
        self.0.state.borrow_mut().position = [x, y];
    }

    /// Position accumulated through all ancestors.
    pub fn world_position(&self) -> [f32; 2] {
        let [mut x, mut y] = self.position();
        let mut cursor = self.parent();
        while let Some(node) = cursor {
            let [px, py] = node.position();
            x += px;
            y += py;
            cursor = node.parent();
        }
        [x, y]
    }

    /// Local opacity.
    pub fn alpha(&self) -> f32 {
        self.0.state.borrow().alpha
    }

    /// Set local opacity, clamped to `[0, 1]`.
    pub fn set_alpha(&self, alpha: f32) {
        self.0.state.borrow_mut().alpha = alpha.clamp(0.0, 1.0);
    }

    /// Whether the node draws (its subtree is skipped when hidden).
    pub fn is_visible(&self) -> bool {
        self.0.state.borrow().visible
    }

    /// Show or hide without detaching.
    pub fn set_visible(&self, visible: bool) {
        self.0.state.borrow_mut().visible = visible;
    }

    /// Copy of the node content.
    pub fn content(&self) -> Content {
        self.0.state.borrow().content.clone()
    }

    /// Copy of the graphics list, when this is a graphics node.
    pub fn graphics(&self) -> Option<Graphics> {
        match &self.0.state.borrow().content {
            Content::Graphics(g) => Some(g.clone()),
            _ => None,
        }
    }

    /// Mutate the graphics list in place. Returns `None` for other content.
    pub fn update_graphics<R>(&self, f: impl FnOnce(&mut Graphics) -> R) -> Option<R> {
        match &mut self.0.state.borrow_mut().content {
            Content::Graphics(g) => Some(f(g)),
            _ => None,
        }
    }

    /// Copy of the text run, when this is a text node.
    pub fn text(&self) -> Option<TextContent> {
        match &self.0.state.borrow().content {
            Content::Text(t) => Some(t.clone()),
            _ => None,
        }
    }

    /// Mutate the text run in place. Returns `None` for other content.
    pub fn update_text<R>(&self, f: impl FnOnce(&mut TextContent) -> R) -> Option<R> {
        match &mut self.0.state.borrow_mut().content {
            Content::Text(t) => Some(f(t)),
            _ => None,
        }
    }

    fn set_parent(&self, parent: &Self) {
        self.0.state.borrow_mut().parent = Rc::downgrade(&parent.0);
    }

    fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent
                .0
                .state
                .borrow_mut()
                .children
                .retain(|c| !c.ptr_eq(self));
            self.0.state.borrow_mut().parent = Weak::new();
        }
    }

    // `child` may not be `self` or any ancestor of `self`.
    fn check_cycle(&self, child: &Self) -> Result<(), SceneError> {
        let mut cursor = Some(self.clone());
        while let Some(node) = cursor {
            if node.ptr_eq(child) {
                return Err(SceneError::WouldCycle {
                    parent: self.id(),
                    child: child.id(),
                });
            }
            cursor = node.parent();
        }
        Ok(())
    }

    fn not_a_child(&self, child: &Self) -> SceneError {
        SceneError::NotAChild {
            parent: self.id(),
            child: child.id(),
        }
    }
}

impl PartialEq for SceneNode {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for SceneNode {}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0.state.borrow();
        f.debug_struct("SceneNode")
            .field("id", &self.0.id)
            .field("content", &state.content.label())
            .field("children", &state.children.len())
            .finish()
    }
}
