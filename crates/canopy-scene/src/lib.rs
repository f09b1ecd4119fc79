// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Retained-mode 2D scene graph for Canopy.
//!
//! Nodes live in a persistent tree and are mutated incrementally; nothing is
//! redrawn from scratch. A [`Stage`] owns the root node and flattens the
//! visible tree into a [`Frame`] on demand.
//!
//! # Ownership
//!
//! [`SceneNode`] is a reference-counted handle. A parent holds strong handles
//! to its children and children point back through weak links, so a node
//! that was built but never attached is freed as soon as its last handle
//! drops.

use thiserror::Error;

mod graphics;
mod node;
mod rectangle;
mod stage;
mod text;

pub use graphics::{Bounds, DrawCommand, Graphics};
pub use node::{Content, NodeId, SceneNode};
pub use rectangle::{draw_rectangle, rectangle, RectStyle};
pub use stage::{DrawItem, DrawKind, Frame, Stage, StageId};
pub use text::{label, TextContent};

/// Errors raised by child-list mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The referenced node is not a child of the parent.
    #[error("node {child} is not a child of {parent}")]
    NotAChild {
        /// Parent the operation targeted.
        parent: NodeId,
        /// Node that was expected among its children.
        child: NodeId,
    },
    /// Attaching the node would make it its own ancestor.
    #[error("attaching {child} under {parent} would create a cycle")]
    WouldCycle {
        /// Intended parent.
        parent: NodeId,
        /// Node being attached.
        child: NodeId,
    },
}
