// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Host adapter that lets a Canopy reconciler drive a `canopy-scene` graph.
//!
//! Supported element kinds are listed in [`kinds`]. Unset props fall back to
//! [`RendererPrefs`](canopy_app_core::prefs::RendererPrefs).

mod context;
mod event;
mod host;
pub mod kinds;
mod patch;

pub use context::SceneContext;
pub use event::{EventSource, InputEvent};
pub use host::SceneHost;
pub use kinds::SceneKind;
pub use patch::{PropChange, ScenePatch};
