// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Retained draw command lists.

/// A single retained drawing instruction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    /// Start a filled region.
    BeginFill {
        /// Fill color as 0xRRGGBB.
        color: u32,
        /// Fill opacity in `[0, 1]`.
        alpha: f32,
    },
    /// Axis-aligned rectangle in local space.
    DrawRect {
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// Width.
        width: f32,
        /// Height.
        height: f32,
    },
    /// Close the current filled region.
    EndFill,
}

/// Axis-aligned bounds in local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Bounds {
    fn union(self, other: Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Self {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

/// Retained vector graphics attached to a scene node.
///
/// Commands accumulate until [`Graphics::clear`] wipes them. Each clear bumps
/// the generation so callers can tell how many times a node was redrawn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graphics {
    commands: Vec<DrawCommand>,
    generation: u64,
}

impl Graphics {
    /// Create an empty command list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all recorded commands.
    pub fn clear(&mut self) -> &mut Self {
        self.commands.clear();
        self.generation += 1;
        self
    }

    /// Begin a filled region.
    pub fn begin_fill(&mut self, color: u32, alpha: f32) -> &mut Self {
        self.commands.push(DrawCommand::BeginFill { color, alpha });
        self
    }

    /// Record a rectangle.
    pub fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.commands.push(DrawCommand::DrawRect {
            x,
            y,
            width,
            height,
        });
        self
    }

    /// End the current filled region.
    pub fn end_fill(&mut self) -> &mut Self {
        self.commands.push(DrawCommand::EndFill);
        self
    }

    /// Recorded commands in submission order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of times the list has been cleared.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Union of all recorded shapes, or `None` when nothing is drawn.
    pub fn bounds(&self) -> Option<Bounds> {
        self.commands
            .iter()
            .filter_map(|cmd| match *cmd {
                DrawCommand::DrawRect {
                    x,
                    y,
                    width,
                    height,
                } => Some(Bounds {
                    x,
                    y,
                    width,
                    height,
                }),
                _ => None,
            })
            .reduce(Bounds::union)
    }
}
