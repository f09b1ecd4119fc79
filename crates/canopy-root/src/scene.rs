// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Ready-made renderer for `canopy-scene` stages.

use canopy_app_core::config::{ConfigError, ConfigService, ConfigStore};
use canopy_app_core::prefs::{RendererPrefs, RENDERER_PREFS_KEY};
use canopy_host_port::{Traced, TracingSink};
use canopy_reconciler::Reconciler;
use canopy_scene_host::SceneHost;

use crate::RootSessionManager;

/// Reconciler over the scene adapter, with every host call mirrored to
/// the `canopy::host` trace target when enabled.
pub type SceneEngine = Reconciler<Traced<SceneHost>>;

/// Session manager rendering into [`canopy_scene::Stage`] containers.
pub type SceneRenderer = RootSessionManager<SceneEngine>;

/// Build a renderer from explicit preferences.
pub fn scene_renderer(prefs: RendererPrefs) -> SceneRenderer {
    let sink = TracingSink::active(prefs.trace_operations);
    let host = Traced::with_sink(SceneHost::with_prefs(prefs), sink);
    RootSessionManager::new(Reconciler::new(host))
}

/// Build a renderer from the preferences stored under
/// [`RENDERER_PREFS_KEY`], falling back to defaults when absent.
pub fn scene_renderer_from_config<S: ConfigStore>(
    config: &ConfigService<S>,
) -> Result<SceneRenderer, ConfigError> {
    let prefs: RendererPrefs = config.load_or_default(RENDERER_PREFS_KEY)?;
    tracing::debug!(target: crate::ROOT_TARGET, ?prefs, "loaded renderer prefs");
    Ok(scene_renderer(prefs))
}
