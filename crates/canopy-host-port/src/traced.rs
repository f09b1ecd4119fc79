// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Observability decorator for host adapters.
//!
//! [`Traced`] wraps any [`HostConfig`] and mirrors each call (operation,
//! arguments, return value) to an [`OperationSink`] before handing the result
//! back unchanged. The wrapped adapter is not modified.

use core::fmt::Debug;
use core::time::Duration;
use std::cell::RefCell;
use std::rc::Rc;

use crate::element::{ElementKind, Props};
use crate::host::{EventPriority, HostConfig, HostOp, Phase, Task, TimeoutId};
use crate::{HostError, HOST_TARGET};

/// One mirrored contract call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationRecord {
    /// Operation invoked.
    pub op: HostOp,
    /// Arguments, `Debug`-formatted.
    pub args: String,
    /// Return value, `Debug`-formatted; `None` for unit returns.
    pub result: Option<String>,
}

impl OperationRecord {
    /// Phase of the recorded operation.
    pub fn phase(&self) -> Phase {
        self.op.phase()
    }
}

/// Destination for mirrored calls.
pub trait OperationSink {
    /// Whether records should be built at all.
    fn enabled(&self) -> bool {
        true
    }

    /// Accept one record.
    fn record(&self, record: OperationRecord);
}

/// Emits records as `trace`-level events under [`HOST_TARGET`].
#[derive(Clone, Copy, Debug)]
pub struct TracingSink {
    active: bool,
}

impl TracingSink {
    /// Sink that emits only while `active` is set.
    pub const fn active(active: bool) -> Self {
        Self { active }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::active(true)
    }
}

impl OperationSink for TracingSink {
    fn enabled(&self) -> bool {
        self.active && tracing::enabled!(target: HOST_TARGET, tracing::Level::TRACE)
    }

    fn record(&self, record: OperationRecord) {
        tracing::trace!(
            target: HOST_TARGET,
            op = %record.op,
            phase = ?record.op.phase(),
            args = %record.args,
            result = record.result.as_deref().unwrap_or("()"),
            "host op"
        );
    }
}

/// Keeps records in memory. Clones share the same log.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    records: Rc<RefCell<Vec<OperationRecord>>>,
}

impl RecordingSink {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every record so far.
    pub fn records(&self) -> Vec<OperationRecord> {
        self.records.borrow().clone()
    }

    /// Records for one operation.
    pub fn of(&self, op: HostOp) -> Vec<OperationRecord> {
        self.records
            .borrow()
            .iter()
            .filter(|r| r.op == op)
            .cloned()
            .collect()
    }

    /// How many times `op` was invoked.
    pub fn count(&self, op: HostOp) -> usize {
        self.records.borrow().iter().filter(|r| r.op == op).count()
    }

    /// Operations in invocation order.
    pub fn ops(&self) -> Vec<HostOp> {
        self.records.borrow().iter().map(|r| r.op).collect()
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<OperationRecord> {
        core::mem::take(&mut *self.records.borrow_mut())
    }

    /// Forget every record.
    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}

impl OperationSink for RecordingSink {
    fn record(&self, record: OperationRecord) {
        self.records.borrow_mut().push(record);
    }
}

/// Host adapter decorator that mirrors every call to a sink.
#[derive(Debug)]
pub struct Traced<H, S = TracingSink> {
    inner: H,
    sink: S,
}

impl<H> Traced<H> {
    /// Mirror calls to `tracing`.
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            sink: TracingSink::default(),
        }
    }
}

impl<H, S> Traced<H, S> {
    /// Mirror calls to `sink`.
    pub fn with_sink(inner: H, sink: S) -> Self {
        Self { inner, sink }
    }

    /// The wrapped adapter.
    pub fn inner(&self) -> &H {
        &self.inner
    }

    /// The sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Unwrap the adapter.
    pub fn into_inner(self) -> H {
        self.inner
    }
}

fn show<T: Debug>(value: &T) -> String {
    format!("{value:?}")
}

impl<H, S> Traced<H, S>
where
    H: HostConfig,
    S: OperationSink,
{
    fn trace<R>(
        &self,
        op: HostOp,
        args: impl FnOnce() -> String,
        call: impl FnOnce() -> R,
        result: impl FnOnce(&R) -> Option<String>,
    ) -> R {
        if !self.sink.enabled() {
            return call();
        }
        let args = args();
        let out = call();
        let result = result(&out);
        self.sink.record(OperationRecord { op, args, result });
        out
    }

    fn container(&self, container: &H::Container) -> String {
        show(&self.inner.container_id(container))
    }
}

impl<H, S> HostConfig for Traced<H, S>
where
    H: HostConfig,
    H::Instance: Debug,
    H::PublicInstance: Debug,
    H::HostContext: Debug,
    H::UpdatePayload: Debug,
    S: OperationSink,
{
    type Container = H::Container;
    type ContainerId = H::ContainerId;
    type Instance = H::Instance;
    type PublicInstance = H::PublicInstance;
    type HostContext = H::HostContext;
    type UpdatePayload = H::UpdatePayload;

    const SUPPORTS_MUTATION: bool = H::SUPPORTS_MUTATION;
    const SUPPORTS_PERSISTENCE: bool = H::SUPPORTS_PERSISTENCE;
    const SUPPORTS_HYDRATION: bool = H::SUPPORTS_HYDRATION;
    const SUPPORTS_MICROTASKS: bool = H::SUPPORTS_MICROTASKS;
    const IS_PRIMARY_RENDERER: bool = H::IS_PRIMARY_RENDERER;

    fn container_id(&self, container: &Self::Container) -> Self::ContainerId {
        self.trace(
            HostOp::ContainerId,
            String::new,
            || self.inner.container_id(container),
            |id| Some(show(id)),
        )
    }

    fn create_instance(
        &self,
        kind: &ElementKind,
        props: &Props,
        container: &Self::Container,
        ctx: &Self::HostContext,
    ) -> Result<Self::Instance, HostError> {
        self.trace(
            HostOp::CreateInstance,
            || format!("{kind} {props:?} {} {ctx:?}", self.container(container)),
            || self.inner.create_instance(kind, props, container, ctx),
            |out| {
                Some(match out {
                    Ok(instance) => show(instance),
                    Err(err) => format!("error: {err}"),
                })
            },
        )
    }

    fn append_initial_child(&self, parent: &Self::Instance, child: &Self::Instance) {
        self.trace(
            HostOp::AppendInitialChild,
            || format!("{parent:?} {child:?}"),
            || self.inner.append_initial_child(parent, child),
            |_| None,
        );
    }

    fn finalize_initial_children(
        &self,
        instance: &Self::Instance,
        kind: &ElementKind,
        props: &Props,
        ctx: &Self::HostContext,
    ) -> bool {
        self.trace(
            HostOp::FinalizeInitialChildren,
            || format!("{instance:?} {kind} {props:?} {ctx:?}"),
            || {
                self.inner
                    .finalize_initial_children(instance, kind, props, ctx)
            },
            |b| Some(show(b)),
        )
    }

    fn prepare_update(
        &self,
        instance: &Self::Instance,
        kind: &ElementKind,
        old: &Props,
        new: &Props,
        ctx: &Self::HostContext,
    ) -> Option<Self::UpdatePayload> {
        self.trace(
            HostOp::PrepareUpdate,
            || format!("{instance:?} {kind} {old:?} {new:?} {ctx:?}"),
            || self.inner.prepare_update(instance, kind, old, new, ctx),
            |payload| Some(show(payload)),
        )
    }

    fn should_set_text_content(&self, kind: &ElementKind, props: &Props) -> bool {
        self.trace(
            HostOp::ShouldSetTextContent,
            || format!("{kind} {props:?}"),
            || self.inner.should_set_text_content(kind, props),
            |b| Some(show(b)),
        )
    }

    fn root_host_context(&self, container: &Self::Container) -> Self::HostContext {
        self.trace(
            HostOp::RootHostContext,
            || self.container(container),
            || self.inner.root_host_context(container),
            |ctx| Some(show(ctx)),
        )
    }

    fn child_host_context(
        &self,
        parent: &Self::HostContext,
        kind: &ElementKind,
        props: &Props,
    ) -> Self::HostContext {
        self.trace(
            HostOp::ChildHostContext,
            || format!("{parent:?} {kind} {props:?}"),
            || self.inner.child_host_context(parent, kind, props),
            |ctx| Some(show(ctx)),
        )
    }

    fn current_event_priority(&self) -> EventPriority {
        self.trace(
            HostOp::CurrentEventPriority,
            String::new,
            || self.inner.current_event_priority(),
            |p| Some(show(p)),
        )
    }

    fn public_instance(&self, instance: &Self::Instance) -> Self::PublicInstance {
        self.trace(
            HostOp::PublicInstance,
            || show(instance),
            || self.inner.public_instance(instance),
            |p| Some(show(p)),
        )
    }

    fn prepare_for_commit(&self, container: &Self::Container) {
        self.trace(
            HostOp::PrepareForCommit,
            || self.container(container),
            || self.inner.prepare_for_commit(container),
            |_| None,
        );
    }

    fn reset_after_commit(&self, container: &Self::Container) {
        self.trace(
            HostOp::ResetAfterCommit,
            || self.container(container),
            || self.inner.reset_after_commit(container),
            |_| None,
        );
    }

    fn schedule_timeout(&self, task: Task, delay: Duration) -> Option<TimeoutId> {
        self.trace(
            HostOp::ScheduleTimeout,
            || show(&delay),
            || self.inner.schedule_timeout(task, delay),
            |id| Some(show(id)),
        )
    }

    fn cancel_timeout(&self, id: TimeoutId) {
        self.trace(
            HostOp::CancelTimeout,
            || show(&id),
            || self.inner.cancel_timeout(id),
            |_| None,
        );
    }

    fn schedule_microtask(&self, task: Task) {
        self.trace(
            HostOp::ScheduleMicrotask,
            String::new,
            || self.inner.schedule_microtask(task),
            |_| None,
        );
    }

    fn append_child(&self, parent: &Self::Instance, child: &Self::Instance) {
        self.trace(
            HostOp::AppendChild,
            || format!("{parent:?} {child:?}"),
            || self.inner.append_child(parent, child),
            |_| None,
        );
    }

    fn append_child_to_container(&self, container: &Self::Container, child: &Self::Instance) {
        self.trace(
            HostOp::AppendChildToContainer,
            || format!("{} {child:?}", self.container(container)),
            || self.inner.append_child_to_container(container, child),
            |_| None,
        );
    }

    fn insert_before(
        &self,
        parent: &Self::Instance,
        child: &Self::Instance,
        before: &Self::Instance,
    ) {
        self.trace(
            HostOp::InsertBefore,
            || format!("{parent:?} {child:?} {before:?}"),
            || self.inner.insert_before(parent, child, before),
            |_| None,
        );
    }

    fn insert_in_container_before(
        &self,
        container: &Self::Container,
        child: &Self::Instance,
        before: &Self::Instance,
    ) {
        self.trace(
            HostOp::InsertInContainerBefore,
            || format!("{} {child:?} {before:?}", self.container(container)),
            || self.inner.insert_in_container_before(container, child, before),
            |_| None,
        );
    }

    fn remove_child(&self, parent: &Self::Instance, child: &Self::Instance) {
        self.trace(
            HostOp::RemoveChild,
            || format!("{parent:?} {child:?}"),
            || self.inner.remove_child(parent, child),
            |_| None,
        );
    }

    fn remove_child_from_container(&self, container: &Self::Container, child: &Self::Instance) {
        self.trace(
            HostOp::RemoveChildFromContainer,
            || format!("{} {child:?}", self.container(container)),
            || self.inner.remove_child_from_container(container, child),
            |_| None,
        );
    }

    fn commit_update(
        &self,
        instance: &Self::Instance,
        payload: Self::UpdatePayload,
        kind: &ElementKind,
        old: &Props,
        new: &Props,
    ) {
        // The payload moves into the inner call, so format it up front.
        let args = self
            .sink
            .enabled()
            .then(|| format!("{instance:?} {payload:?} {kind} {old:?} {new:?}"));
        self.inner.commit_update(instance, payload, kind, old, new);
        if let Some(args) = args {
            self.sink.record(OperationRecord {
                op: HostOp::CommitUpdate,
                args,
                result: None,
            });
        }
    }

    fn commit_mount(&self, instance: &Self::Instance, kind: &ElementKind, props: &Props) {
        self.trace(
            HostOp::CommitMount,
            || format!("{instance:?} {kind} {props:?}"),
            || self.inner.commit_mount(instance, kind, props),
            |_| None,
        );
    }

    fn hide_instance(&self, instance: &Self::Instance) {
        self.trace(
            HostOp::HideInstance,
            || show(instance),
            || self.inner.hide_instance(instance),
            |_| None,
        );
    }

    fn unhide_instance(&self, instance: &Self::Instance, props: &Props) {
        self.trace(
            HostOp::UnhideInstance,
            || format!("{instance:?} {props:?}"),
            || self.inner.unhide_instance(instance, props),
            |_| None,
        );
    }

    fn clear_container(&self, container: &Self::Container) {
        self.trace(
            HostOp::ClearContainer,
            || self.container(container),
            || self.inner.clear_container(container),
            |_| None,
        );
    }

    fn reset_text_content(&self, instance: &Self::Instance) {
        self.trace(
            HostOp::ResetTextContent,
            || show(instance),
            || self.inner.reset_text_content(instance),
            |_| None,
        );
    }
}
