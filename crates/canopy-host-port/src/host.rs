// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The host-adapter trait.

use core::fmt;
use core::hash::Hash;
use core::time::Duration;

use crate::element::{ElementKind, Props};
use crate::HostError;

/// Deferred unit of work handed to the scheduling hooks.
pub type Task = Box<dyn FnOnce() + 'static>;

/// Handle to a scheduled timeout.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimeoutId(pub u64);

/// Urgency class for an update, derived from the active input event.
///
/// Variants sort from most to least urgent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventPriority {
    /// Discrete user input (click, key press).
    Discrete,
    /// Continuous input (pointer move, scroll).
    Continuous,
    /// No active event.
    Default,
    /// Background work.
    Idle,
}

/// When a contract operation runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Pure, possibly discarded computation over the work-in-progress tree.
    Render,
    /// Mutation of the live tree after a render pass was accepted.
    Commit,
    /// Engine-internal batching hooks.
    Scheduling,
}

/// Every operation of [`HostConfig`], by name.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostOp {
    ContainerId,
    CreateInstance,
    AppendInitialChild,
    FinalizeInitialChildren,
    PrepareUpdate,
    ShouldSetTextContent,
    RootHostContext,
    ChildHostContext,
    CurrentEventPriority,
    PublicInstance,
    PrepareForCommit,
    ResetAfterCommit,
    ScheduleTimeout,
    CancelTimeout,
    ScheduleMicrotask,
    AppendChild,
    AppendChildToContainer,
    InsertBefore,
    InsertInContainerBefore,
    RemoveChild,
    RemoveChildFromContainer,
    CommitUpdate,
    CommitMount,
    HideInstance,
    UnhideInstance,
    ClearContainer,
    ResetTextContent,
}

impl HostOp {
    /// Snake-case method name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ContainerId => "container_id",
            Self::CreateInstance => "create_instance",
            Self::AppendInitialChild => "append_initial_child",
            Self::FinalizeInitialChildren => "finalize_initial_children",
            Self::PrepareUpdate => "prepare_update",
            Self::ShouldSetTextContent => "should_set_text_content",
            Self::RootHostContext => "root_host_context",
            Self::ChildHostContext => "child_host_context",
            Self::CurrentEventPriority => "current_event_priority",
            Self::PublicInstance => "public_instance",
            Self::PrepareForCommit => "prepare_for_commit",
            Self::ResetAfterCommit => "reset_after_commit",
            Self::ScheduleTimeout => "schedule_timeout",
            Self::CancelTimeout => "cancel_timeout",
            Self::ScheduleMicrotask => "schedule_microtask",
            Self::AppendChild => "append_child",
            Self::AppendChildToContainer => "append_child_to_container",
            Self::InsertBefore => "insert_before",
            Self::InsertInContainerBefore => "insert_in_container_before",
            Self::RemoveChild => "remove_child",
            Self::RemoveChildFromContainer => "remove_child_from_container",
            Self::CommitUpdate => "commit_update",
            Self::CommitMount => "commit_mount",
            Self::HideInstance => "hide_instance",
            Self::UnhideInstance => "unhide_instance",
            Self::ClearContainer => "clear_container",
            Self::ResetTextContent => "reset_text_content",
        }
    }

    /// Phase the operation belongs to.
    pub const fn phase(self) -> Phase {
        match self {
            Self::ScheduleTimeout | Self::CancelTimeout | Self::ScheduleMicrotask => {
                Phase::Scheduling
            }
            Self::PrepareForCommit
            | Self::ResetAfterCommit
            | Self::AppendChild
            | Self::AppendChildToContainer
            | Self::InsertBefore
            | Self::InsertInContainerBefore
            | Self::RemoveChild
            | Self::RemoveChildFromContainer
            | Self::CommitUpdate
            | Self::CommitMount
            | Self::HideInstance
            | Self::UnhideInstance
            | Self::ClearContainer
            | Self::ResetTextContent => Phase::Commit,
            _ => Phase::Render,
        }
    }
}

impl fmt::Display for HostOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Renderer target driven by a reconciliation engine.
///
/// Only mutation mode is supported: persistence and hydration are declared
/// off through the feature flags and have no call sites.
///
/// # Render phase
///
/// Methods up to [`HostConfig::schedule_microtask`] may run speculatively. They
/// must not touch any node except the one under construction and must not
/// attach anything to the live tree. [`HostConfig::create_instance`] is the
/// only fallible operation.
///
/// # Commit phase
///
/// The remaining methods run synchronously, in order, once a whole pass was
/// accepted, and are never interleaved with another pass. A reference the
/// adapter never created, or already removed, is a contract violation.
///
/// # Node lifecycle
///
/// `created → mounted → (updated)* → (hidden ⇄ shown)* → removed`. Created
/// nodes that never mount are dropped without notice; removed is terminal.
pub trait HostConfig {
    /// Root rendering surface.
    type Container;
    /// Identity of a container, used to key root handles.
    type ContainerId: Copy + Eq + Hash + fmt::Debug;
    /// Live scene node handle.
    type Instance: Clone;
    /// What refs expose; by default the node itself.
    type PublicInstance: From<Self::Instance>;
    /// Value propagated top-down during the render phase.
    type HostContext: Clone + Default;
    /// Adapter-private diff computed in the render phase, applied once in commit.
    type UpdatePayload;

    /// Mutation-mode operations are implemented.
    const SUPPORTS_MUTATION: bool = true;
    /// Persistent (clone-on-write) mode.
    const SUPPORTS_PERSISTENCE: bool = false;
    /// Attaching to pre-existing content.
    const SUPPORTS_HYDRATION: bool = false;
    /// [`HostConfig::schedule_microtask`] defers instead of running inline.
    const SUPPORTS_MICROTASKS: bool = false;
    /// Whether this renderer owns global engine state.
    const IS_PRIMARY_RENDERER: bool = false;

    /// Identity of `container`.
    fn container_id(&self, container: &Self::Container) -> Self::ContainerId;

    /// Build a detached node for `kind`, applying kind defaults and the
    /// initial draw.
    fn create_instance(
        &self,
        kind: &ElementKind,
        props: &Props,
        container: &Self::Container,
        ctx: &Self::HostContext,
    ) -> Result<Self::Instance, HostError>;

    /// Attach `child` under a parent that is still under construction.
    fn append_initial_child(&self, parent: &Self::Instance, child: &Self::Instance);

    /// Finish a freshly built node. Returning `true` requests
    /// [`HostConfig::commit_mount`] after the node is placed.
    fn finalize_initial_children(
        &self,
        _instance: &Self::Instance,
        _kind: &ElementKind,
        _props: &Props,
        _ctx: &Self::HostContext,
    ) -> bool {
        false
    }

    /// Diff `old` against `new`. `None` means nothing to apply.
    fn prepare_update(
        &self,
        _instance: &Self::Instance,
        _kind: &ElementKind,
        _old: &Props,
        _new: &Props,
        _ctx: &Self::HostContext,
    ) -> Option<Self::UpdatePayload> {
        None
    }

    /// Whether `kind` manages its own text, so children are not reconciled.
    fn should_set_text_content(&self, _kind: &ElementKind, _props: &Props) -> bool {
        false
    }

    /// Context for the top level of a fresh root.
    fn root_host_context(&self, _container: &Self::Container) -> Self::HostContext {
        Self::HostContext::default()
    }

    /// Context for the children of a `kind` node.
    fn child_host_context(
        &self,
        parent: &Self::HostContext,
        _kind: &ElementKind,
        _props: &Props,
    ) -> Self::HostContext {
        parent.clone()
    }

    /// Priority of the input event currently being dispatched.
    fn current_event_priority(&self) -> EventPriority {
        EventPriority::Default
    }

    /// Value exposed to application refs.
    fn public_instance(&self, instance: &Self::Instance) -> Self::PublicInstance {
        Self::PublicInstance::from(instance.clone())
    }

    /// Called once before the first mutation of a commit.
    fn prepare_for_commit(&self, _container: &Self::Container) {}

    /// Called once after the last mutation of a commit.
    fn reset_after_commit(&self, _container: &Self::Container) {}

    /// Run `task` after `delay`. The default runs it inline and returns no
    /// handle.
    fn schedule_timeout(&self, task: Task, _delay: Duration) -> Option<TimeoutId> {
        task();
        None
    }

    /// Cancel a pending timeout.
    fn cancel_timeout(&self, _id: TimeoutId) {}

    /// Run `task` at the end of the current turn. The default runs it inline.
    fn schedule_microtask(&self, task: Task) {
        task();
    }

    /// Move or attach `child` to the end of `parent`.
    fn append_child(&self, parent: &Self::Instance, child: &Self::Instance);

    /// Move or attach `child` to the end of the container.
    fn append_child_to_container(&self, container: &Self::Container, child: &Self::Instance);

    /// Move or attach `child` immediately before `before`.
    fn insert_before(
        &self,
        parent: &Self::Instance,
        child: &Self::Instance,
        before: &Self::Instance,
    );

    /// Move or attach `child` before `before` at the container level.
    fn insert_in_container_before(
        &self,
        container: &Self::Container,
        child: &Self::Instance,
        before: &Self::Instance,
    );

    /// Detach `child` from `parent`. Its subtree goes with it.
    fn remove_child(&self, parent: &Self::Instance, child: &Self::Instance);

    /// Detach a top-level `child` from the container.
    fn remove_child_from_container(&self, container: &Self::Container, child: &Self::Instance);

    /// Apply a payload produced by [`HostConfig::prepare_update`].
    fn commit_update(
        &self,
        _instance: &Self::Instance,
        _payload: Self::UpdatePayload,
        _kind: &ElementKind,
        _old: &Props,
        _new: &Props,
    ) {
    }

    /// Post-placement hook requested by [`HostConfig::finalize_initial_children`].
    fn commit_mount(&self, _instance: &Self::Instance, _kind: &ElementKind, _props: &Props) {}

    /// Hide without detaching.
    fn hide_instance(&self, _instance: &Self::Instance) {}

    /// Undo [`HostConfig::hide_instance`].
    fn unhide_instance(&self, _instance: &Self::Instance, _props: &Props) {}

    /// Remove every child of the container in one step.
    fn clear_container(&self, container: &Self::Container);

    /// Clear text a node set for itself.
    fn reset_text_content(&self, _instance: &Self::Instance) {}
}
