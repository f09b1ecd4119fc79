// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Stage: the canvas-attached root of a scene.

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::graphics::Bounds;
use crate::node::{Content, NodeId, SceneNode};

static NEXT_STAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique stage identity.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StageId(pub u64);

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage-{}", self.0)
    }
}

/// Rendering surface owning a root node.
///
/// Clones share the same root node and identity.
#[derive(Clone, Debug)]
pub struct Stage {
    id: StageId,
    root: SceneNode,
    width: u32,
    height: u32,
    resolution: f32,
}

impl Stage {
    /// Create a stage with resolution 1.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            id: StageId(NEXT_STAGE_ID.fetch_add(1, Ordering::Relaxed)),
            root: SceneNode::group(),
            width,
            height,
            resolution: 1.0,
        }
    }

    /// Set the device pixel ratio used for text rasterization.
    pub fn with_resolution(mut self, resolution: f32) -> Self {
        self.resolution = resolution;
        self
    }

    /// Stage identity.
    pub fn id(&self) -> StageId {
        self.id
    }

    /// Root node all content hangs from.
    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    /// Surface size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Device pixel ratio.
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// Flatten the visible tree into paint order.
    pub fn frame(&self) -> Frame {
        let mut items = Vec::new();
        collect(&self.root, [0.0, 0.0], 1.0, &mut items);
        Frame { items }
    }
}

fn collect(node: &SceneNode, origin: [f32; 2], alpha: f32, out: &mut Vec<DrawItem>) {
    if !node.is_visible() {
        return;
    }
    let [x, y] = node.position();
    let world = [origin[0] + x, origin[1] + y];
    let alpha = alpha * node.alpha();
    let kind = match node.content() {
        Content::Empty => None,
        Content::Graphics(g) => Some(DrawKind::Shape(g.bounds())),
        Content::Text(t) => Some(DrawKind::Text(t.text)),
    };
    if let Some(kind) = kind {
        out.push(DrawItem {
            node: node.id(),
            world,
            alpha,
            kind,
        });
    }
    for child in node.children() {
        collect(&child, world, alpha, out);
    }
}

/// What a draw item paints.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawKind {
    /// Vector shape with its local bounds.
    Shape(Option<Bounds>),
    /// Text run.
    Text(String),
}

/// One visible drawable in world space.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawItem {
    /// Source node.
    pub node: NodeId,
    /// World-space origin.
    pub world: [f32; 2],
    /// Effective opacity after ancestors.
    pub alpha: f32,
    /// Drawable payload.
    pub kind: DrawKind,
}

/// Flattened visible scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    items: Vec<DrawItem>,
}

impl Frame {
    /// Draw items in paint order.
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    /// Number of visible drawables.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
