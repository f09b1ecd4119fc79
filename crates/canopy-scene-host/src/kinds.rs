// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Element kinds and prop names understood by [`SceneHost`](crate::SceneHost).

use canopy_host_port::{ElementKind, HostError};

/// Grouping node: `x`, `y`, `alpha`.
pub const CONTAINER: ElementKind = ElementKind::from_static("container");
/// Filled rectangle: `x`, `y`, `width`, `height`, `fill`, `alpha`.
pub const RECTANGLE: ElementKind = ElementKind::from_static("rectangle");
/// Text run that owns its content: `x`, `y`, `text`, `font_size`, `fill`, `alpha`.
pub const LABEL: ElementKind = ElementKind::from_static("label");

/// Horizontal offset in the parent's space.
pub const X: &str = "x";
/// Vertical offset in the parent's space.
pub const Y: &str = "y";
/// Opacity in `[0, 1]`.
pub const ALPHA: &str = "alpha";
/// Rectangle width.
pub const WIDTH: &str = "width";
/// Rectangle height.
pub const HEIGHT: &str = "height";
/// Fill color, 0xRRGGBB.
pub const FILL: &str = "fill";
/// Label text.
pub const TEXT: &str = "text";
/// Label font size.
pub const FONT_SIZE: &str = "font_size";

/// Closed set of kinds the adapter can build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneKind {
    /// See [`CONTAINER`].
    Container,
    /// See [`RECTANGLE`].
    Rectangle,
    /// See [`LABEL`].
    Label,
}

impl SceneKind {
    /// Resolve a tag, rejecting unknown kinds.
    pub fn parse(kind: &ElementKind) -> Result<Self, HostError> {
        match kind.as_str() {
            "container" => Ok(Self::Container),
            "rectangle" => Ok(Self::Rectangle),
            "label" => Ok(Self::Label),
            _ => Err(HostError::UnsupportedKind { kind: kind.clone() }),
        }
    }

    /// Props this kind reads. Anything else is ignored.
    pub fn props(self) -> &'static [&'static str] {
        match self {
            Self::Container => &[X, Y, ALPHA],
            Self::Rectangle => &[X, Y, ALPHA, WIDTH, HEIGHT, FILL],
            Self::Label => &[X, Y, ALPHA, TEXT, FONT_SIZE, FILL],
        }
    }

    /// Whether `name` is one of [`SceneKind::props`].
    pub fn accepts(self, name: &str) -> bool {
        self.props().contains(&name)
    }
}
