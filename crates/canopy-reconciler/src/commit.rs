// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Effect list collected during render and replayed against the host.
//!
//! Replay order is fixed: deletions, text resets, placements, updates,
//! visibility toggles, then mount hooks. The whole list runs between one
//! `prepare_for_commit` / `reset_after_commit` pair.

use canopy_host_port::{ElementKind, HostConfig, Props};

/// Where a node is attached.
pub(crate) enum Parent<H: HostConfig> {
    Container,
    Node(H::Instance),
}

impl<H: HostConfig> Clone for Parent<H> {
    fn clone(&self) -> Self {
        match self {
            Self::Container => Self::Container,
            Self::Node(node) => Self::Node(node.clone()),
        }
    }
}

pub(crate) struct Deletion<H: HostConfig> {
    pub(crate) parent: Parent<H>,
    pub(crate) instance: H::Instance,
}

pub(crate) struct Placement<H: HostConfig> {
    pub(crate) parent: Parent<H>,
    pub(crate) instance: H::Instance,
    pub(crate) before: Option<H::Instance>,
}

pub(crate) struct Update<H: HostConfig> {
    pub(crate) instance: H::Instance,
    pub(crate) payload: H::UpdatePayload,
    pub(crate) kind: ElementKind,
    pub(crate) old: Props,
    pub(crate) new: Props,
}

pub(crate) enum Visibility<H: HostConfig> {
    Hide(H::Instance),
    Unhide(H::Instance, Props),
}

pub(crate) struct Mount<H: HostConfig> {
    pub(crate) instance: H::Instance,
    pub(crate) kind: ElementKind,
    pub(crate) props: Props,
}

/// Everything a render pass wants done to the live tree.
pub(crate) struct Effects<H: HostConfig> {
    pub(crate) clear_container: bool,
    pub(crate) deletions: Vec<Deletion<H>>,
    pub(crate) text_resets: Vec<H::Instance>,
    pub(crate) placements: Vec<Placement<H>>,
    pub(crate) updates: Vec<Update<H>>,
    pub(crate) visibility: Vec<Visibility<H>>,
    pub(crate) mounts: Vec<Mount<H>>,
    pub(crate) created: usize,
}

impl<H: HostConfig> Default for Effects<H> {
    fn default() -> Self {
        Self {
            clear_container: false,
            deletions: Vec::new(),
            text_resets: Vec::new(),
            placements: Vec::new(),
            updates: Vec::new(),
            visibility: Vec::new(),
            mounts: Vec::new(),
            created: 0,
        }
    }
}

/// Counters reported once a commit finished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitStats {
    /// Instances built during the render pass.
    pub created: usize,
    /// Subtree roots detached.
    pub removed: usize,
    /// Appends and inserts, including moves.
    pub placed: usize,
    /// Payloads applied.
    pub updated: usize,
    /// Hide and unhide calls.
    pub toggled: usize,
}

impl<H: HostConfig> Effects<H> {
    pub(crate) fn commit(self, host: &H, container: &H::Container) -> CommitStats {
        let stats = CommitStats {
            created: self.created,
            removed: self.deletions.len(),
            placed: self.placements.len(),
            updated: self.updates.len(),
            toggled: self.visibility.len(),
        };

        host.prepare_for_commit(container);
        if self.clear_container {
            host.clear_container(container);
        }
        for Deletion { parent, instance } in self.deletions {
            match parent {
                Parent::Container => host.remove_child_from_container(container, &instance),
                Parent::Node(p) => host.remove_child(&p, &instance),
            }
        }
        for instance in self.text_resets {
            host.reset_text_content(&instance);
        }
        for Placement {
            parent,
            instance,
            before,
        } in self.placements
        {
            match (parent, before) {
                (Parent::Container, None) => host.append_child_to_container(container, &instance),
                (Parent::Container, Some(b)) => {
                    host.insert_in_container_before(container, &instance, &b);
                }
                (Parent::Node(p), None) => host.append_child(&p, &instance),
                (Parent::Node(p), Some(b)) => host.insert_before(&p, &instance, &b),
            }
        }
        for Update {
            instance,
            payload,
            kind,
            old,
            new,
        } in self.updates
        {
            host.commit_update(&instance, payload, &kind, &old, &new);
        }
        for toggle in self.visibility {
            match toggle {
                Visibility::Hide(instance) => host.hide_instance(&instance),
                Visibility::Unhide(instance, props) => host.unhide_instance(&instance, &props),
            }
        }
        for Mount {
            instance,
            kind,
            props,
        } in self.mounts
        {
            host.commit_mount(&instance, &kind, &props);
        }
        host.reset_after_commit(container);
        stats
    }
}
