// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rectangle primitive.

use crate::graphics::Graphics;
use crate::node::{Content, SceneNode};

/// Resolved rectangle geometry and fill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectStyle {
    /// Width in local units.
    pub width: f32,
    /// Height in local units.
    pub height: f32,
    /// Fill color as 0xRRGGBB.
    pub fill: u32,
    /// Fill opacity.
    pub fill_alpha: f32,
}

/// Replace `graphics` with a single filled rectangle anchored at the origin.
pub fn draw_rectangle(graphics: &mut Graphics, style: &RectStyle) {
    graphics
        .clear()
        .begin_fill(style.fill, style.fill_alpha)
        .draw_rect(0.0, 0.0, style.width, style.height)
        .end_fill();
}

/// Build a detached graphics node and perform its initial draw.
pub fn rectangle(style: &RectStyle) -> SceneNode {
    let mut graphics = Graphics::new();
    draw_rectangle(&mut graphics, style);
    SceneNode::new(Content::Graphics(graphics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::DrawCommand;

    #[test]
    fn initial_draw_is_one_filled_rect() {
        let node = rectangle(&RectStyle {
            width: 50.0,
            height: 20.0,
            fill: 0x336699,
            fill_alpha: 1.0,
        });
        let g = node.graphics().unwrap();
        assert_eq!(g.generation(), 1);
        assert_eq!(
            g.commands(),
            &[
                DrawCommand::BeginFill {
                    color: 0x336699,
                    alpha: 1.0
                },
                DrawCommand::DrawRect {
                    x: 0.0,
                    y: 0.0,
                    width: 50.0,
                    height: 20.0
                },
                DrawCommand::EndFill,
            ]
        );
    }
}
