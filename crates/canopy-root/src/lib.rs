// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! canopy-root: the application-facing render entry point.
//!
//! [`RootSessionManager`] owns the association between a container and the
//! engine's root handle. The first [`render`](RootSessionManager::render)
//! against a container creates the handle; every later call reuses it and
//! submits a fresh update.

use std::cell::RefCell;
use std::collections::HashMap;

use canopy_host_port::{Completion, Element, Engine};

mod scene;

pub use canopy_scene::Stage;
pub use scene::{scene_renderer, scene_renderer_from_config, SceneEngine, SceneRenderer};

/// Log target for root lifecycle events.
pub const ROOT_TARGET: &str = "canopy::root";

/// Caches one root handle per container identity.
///
/// Handles are never evicted: unmounting renders an empty tree against the
/// cached handle, so a container sees at most one root for its lifetime.
pub struct RootSessionManager<E: Engine> {
    engine: E,
    roots: RefCell<HashMap<E::ContainerId, E::RootHandle>>,
}

impl<E: Engine> RootSessionManager<E> {
    /// Manager over `engine` with no roots yet.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            roots: RefCell::new(HashMap::new()),
        }
    }

    /// The engine updates are submitted to.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mount or update `element` in `container`.
    ///
    /// `completion` runs once the commit phase finished; it is dropped unrun
    /// when the pass fails.
    pub fn render(
        &self,
        element: Element,
        container: &E::Container,
        completion: Option<Completion>,
    ) -> Result<E::Token, E::Error> {
        let root = self.root_or_create(container);
        self.engine
            .update_container(Some(element), &root, completion)
    }

    /// Render an empty tree into `container`. Returns `Ok(None)` when nothing
    /// was ever rendered there.
    pub fn unmount(&self, container: &E::Container) -> Result<Option<E::Token>, E::Error> {
        let Some(root) = self.root_for(container) else {
            return Ok(None);
        };
        tracing::debug!(
            target: ROOT_TARGET,
            container = ?self.engine.container_id(container),
            "unmount"
        );
        self.engine.update_container(None, &root, None).map(Some)
    }

    /// Cached handle for `container`, if one was created.
    pub fn root_for(&self, container: &E::Container) -> Option<E::RootHandle> {
        let id = self.engine.container_id(container);
        self.roots.borrow().get(&id).cloned()
    }

    /// Number of containers with a root.
    pub fn len(&self) -> usize {
        self.roots.borrow().len()
    }

    /// Whether no root was created yet.
    pub fn is_empty(&self) -> bool {
        self.roots.borrow().is_empty()
    }

    fn root_or_create(&self, container: &E::Container) -> E::RootHandle {
        let id = self.engine.container_id(container);
        self.roots
            .borrow_mut()
            .entry(id)
            .or_insert_with(|| {
                tracing::info!(target: ROOT_TARGET, container = ?id, "created root");
                self.engine.create_container(container)
            })
            .clone()
    }
}
