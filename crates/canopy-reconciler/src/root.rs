// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Logical root of a mounted tree.

use core::fmt;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use canopy_host_port::HostConfig;

use crate::fiber::Fiber;

pub(crate) struct RootInner<H: HostConfig> {
    pub(crate) container: H::Container,
    pub(crate) id: H::ContainerId,
    pub(crate) current: RefCell<Vec<Fiber<H>>>,
    pub(crate) commits: Cell<u64>,
}

/// Shared handle to one container's committed tree.
///
/// Clones refer to the same root; compare them with [`RootHandle::ptr_eq`].
pub struct RootHandle<H: HostConfig>(pub(crate) Rc<RootInner<H>>);

impl<H: HostConfig> RootHandle<H> {
    pub(crate) fn new(container: H::Container, id: H::ContainerId) -> Self {
        Self(Rc::new(RootInner {
            container,
            id,
            current: RefCell::new(Vec::new()),
            commits: Cell::new(0),
        }))
    }

    /// Whether both handles refer to the same root.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Container the root renders into.
    pub fn container(&self) -> &H::Container {
        &self.0.container
    }

    /// Identity of the container.
    pub fn container_id(&self) -> H::ContainerId {
        self.0.id
    }

    /// Whether the last commit left anything mounted.
    pub fn is_mounted(&self) -> bool {
        self.0
            .current
            .try_borrow()
            .map_or(true, |current| !current.is_empty())
    }

    /// Number of commits applied so far.
    pub fn commits(&self) -> u64 {
        self.0.commits.get()
    }
}

impl<H: HostConfig> Clone for RootHandle<H> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<H: HostConfig> fmt::Debug for RootHandle<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootHandle")
            .field("container", &self.0.id)
            .field("commits", &self.commits())
            .finish_non_exhaustive()
    }
}
