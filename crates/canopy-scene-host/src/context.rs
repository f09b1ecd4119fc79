// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Host context threaded down the render phase.

use canopy_host_port::Props;

use crate::kinds::{X, Y};

/// Where a node sits in the scene, as seen by its children.
///
/// Derived per child and never mutated in place. `depth` and `origin` are
/// not read when creating a node; they only inform its descendants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneContext {
    /// Nesting depth below the stage root.
    pub depth: u32,
    /// World-space origin of the parent's coordinate space.
    pub origin: [f32; 2],
    /// Stage device pixel ratio, used to rasterize text.
    pub resolution: f32,
}

impl Default for SceneContext {
    fn default() -> Self {
        Self {
            depth: 0,
            origin: [0.0, 0.0],
            resolution: 1.0,
        }
    }
}

impl SceneContext {
    /// One level deeper, same origin.
    pub fn descend(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..*self
        }
    }

    /// Context for the children of a group carrying `props`: one level
    /// deeper, origin shifted by the group's `x`/`y`.
    pub fn descend_into_group(&self, props: &Props) -> Self {
        let offset = |name: &str| {
            props.number(name).filter(|n| n.is_finite()).unwrap_or(0.0) as f32
        };
        Self {
            origin: [self.origin[0] + offset(X), self.origin[1] + offset(Y)],
            ..self.descend()
        }
    }
}
