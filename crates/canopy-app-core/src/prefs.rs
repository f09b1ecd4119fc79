// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Renderer preferences shared by Canopy host adapters.

use serde::{Deserialize, Serialize};

/// Config key the preferences are stored under.
pub const RENDERER_PREFS_KEY: &str = "renderer";

/// Defaults applied to props an element leaves unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererPrefs {
    /// Width for shapes without a `width` prop.
    pub default_width: f32,
    /// Height for shapes without a `height` prop.
    pub default_height: f32,
    /// Fill color (0xRRGGBB) for shapes without a `fill` prop.
    pub default_fill: u32,
    /// Opacity for nodes without an `alpha` prop.
    pub default_alpha: f32,
    /// Font size for labels without a `font_size` prop.
    pub default_font_size: f32,
    /// Mirror every host-contract call to the `canopy::host` trace target.
    pub trace_operations: bool,
}

impl Default for RendererPrefs {
    fn default() -> Self {
        Self {
            default_width: 100.0,
            default_height: 100.0,
            default_fill: 0xFF_FF_FF,
            default_alpha: 1.0,
            default_font_size: 16.0,
            trace_operations: false,
        }
    }
}
