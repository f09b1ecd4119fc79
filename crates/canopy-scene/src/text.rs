// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Text runs.

use crate::node::{Content, SceneNode};

/// A single-line text run.
#[derive(Clone, Debug, PartialEq)]
pub struct TextContent {
    /// The string drawn.
    pub text: String,
    /// Font size in local units.
    pub font_size: f32,
    /// Text color as 0xRRGGBB.
    pub fill: u32,
    /// Rasterization scale relative to local units.
    pub resolution: f32,
}

/// Build a detached text node.
pub fn label(content: TextContent) -> SceneNode {
    SceneNode::new(Content::Text(content))
}
