// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Engine port: what a root session manager needs from a reconciler.

use core::fmt;
use core::hash::Hash;

use crate::element::Element;

/// Callback run once the commit phase of an update finished.
pub type Completion = Box<dyn FnOnce() + 'static>;

/// Reconciliation engine seen from the application side.
pub trait Engine {
    /// Rendering surface the engine mounts into.
    type Container;
    /// Identity of a container.
    type ContainerId: Copy + Eq + Hash + fmt::Debug;
    /// Opaque logical root of a mounted tree.
    type RootHandle: Clone;
    /// Value returned for each submitted update.
    type Token;
    /// Failure of a render pass.
    type Error: std::error::Error;

    /// Identity of `container`.
    fn container_id(&self, container: &Self::Container) -> Self::ContainerId;

    /// Create the logical root for `container`. Nothing is rendered yet.
    fn create_container(&self, container: &Self::Container) -> Self::RootHandle;

    /// Reconcile `element` against `root`. `None` unmounts everything.
    ///
    /// `completion` runs after the commit phase; it is dropped unrun when the
    /// pass aborts.
    fn update_container(
        &self,
        element: Option<Element>,
        root: &Self::RootHandle,
        completion: Option<Completion>,
    ) -> Result<Self::Token, Self::Error>;
}
