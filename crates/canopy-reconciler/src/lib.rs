// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! canopy-reconciler: diff element trees and drive a [`HostConfig`].
//!
//! Each [`Engine::update_container`] call runs one synchronous pass:
//!
//! 1. **Render.** The new element tree is matched against the committed tree
//!    by key (or position when unkeyed) and kind. Matches get a
//!    `prepare_update` call; everything else is built detached with
//!    `create_instance` and `append_initial_child`. No live node is touched.
//! 2. **Commit.** Only if render succeeded for the whole tree, the collected
//!    effects are replayed against the host in a fixed order.
//!
//! A [`HostError`] during render aborts the pass with the committed tree and
//! the scene unchanged, and the completion callback is dropped unrun.

use std::cell::Cell;

use canopy_host_port::{Completion, Element, Engine, EventPriority, HostConfig, HostError};
use thiserror::Error;

mod commit;
mod fiber;
mod render;
mod root;

pub use commit::CommitStats;
pub use root::RootHandle;

use render::RenderPass;

/// Log target for render and commit passes.
pub const RECONCILER_TARGET: &str = "canopy::reconciler";

/// Render pass failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// The host refused to build a node.
    #[error(transparent)]
    Host(#[from] HostError),
    /// An update was submitted while the same root was committing.
    #[error("root {container} is already committing")]
    Reentrant {
        /// Debug rendering of the container identity.
        container: String,
    },
}

/// Receipt for one committed update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdateToken {
    /// Engine-wide pass number, one per committed pass. Rejected or aborted
    /// updates do not consume one.
    pub sequence: u64,
    /// Priority of the input event active when the update was submitted.
    pub priority: EventPriority,
    /// What the commit did.
    pub stats: CommitStats,
}

/// Synchronous reconciler over a host adapter.
#[derive(Debug)]
pub struct Reconciler<H: HostConfig> {
    host: H,
    sequence: Cell<u64>,
}

impl<H: HostConfig> Reconciler<H> {
    /// Wrap `host`.
    pub fn new(host: H) -> Self {
        Self {
            host,
            sequence: Cell::new(0),
        }
    }

    /// The wrapped host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Unwrap the host.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Public instances of the top-level nodes currently mounted under `root`.
    pub fn public_children(&self, root: &RootHandle<H>) -> Vec<H::PublicInstance> {
        root.0.current.try_borrow().map_or_else(
            |_| Vec::new(),
            |current| {
                current
                    .iter()
                    .map(|fiber| self.host.public_instance(&fiber.instance))
                    .collect()
            },
        )
    }
}

impl<H> Engine for Reconciler<H>
where
    H: HostConfig,
    H::Container: Clone,
{
    type Container = H::Container;
    type ContainerId = H::ContainerId;
    type RootHandle = RootHandle<H>;
    type Token = UpdateToken;
    type Error = ReconcileError;

    fn container_id(&self, container: &H::Container) -> H::ContainerId {
        self.host.container_id(container)
    }

    fn create_container(&self, container: &H::Container) -> RootHandle<H> {
        let id = self.host.container_id(container);
        tracing::debug!(target: RECONCILER_TARGET, container = ?id, "root created");
        RootHandle::new(container.clone(), id)
    }

    fn update_container(
        &self,
        element: Option<Element>,
        root: &RootHandle<H>,
        completion: Option<Completion>,
    ) -> Result<UpdateToken, ReconcileError> {
        let inner = &root.0;
        let priority = self.host.current_event_priority();
        let sequence = self.sequence.get() + 1;

        let stats = {
            let mut current =
                inner
                    .current
                    .try_borrow_mut()
                    .map_err(|_| ReconcileError::Reentrant {
                        container: format!("{:?}", inner.id),
                    })?;
            let pass = RenderPass::new(&self.host, &inner.container);
            let (next, effects) = match pass.run(&current, element.as_ref()) {
                Ok(done) => done,
                Err(err) => {
                    tracing::warn!(
                        target: RECONCILER_TARGET,
                        container = ?inner.id,
                        sequence,
                        error = %err,
                        "render aborted"
                    );
                    return Err(err.into());
                }
            };
            let stats = effects.commit(&self.host, &inner.container);
            *current = next;
            stats
        };
        self.sequence.set(sequence);
        inner.commits.set(inner.commits.get() + 1);
        tracing::debug!(
            target: RECONCILER_TARGET,
            container = ?inner.id,
            sequence,
            ?priority,
            created = stats.created,
            removed = stats.removed,
            placed = stats.placed,
            updated = stats.updated,
            toggled = stats.toggled,
            "committed"
        );

        if let Some(done) = completion {
            if H::SUPPORTS_MICROTASKS {
                self.host.schedule_microtask(done);
            } else {
                done();
            }
        }
        Ok(UpdateToken {
            sequence,
            priority,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_host_port::{ElementKind, Props, Task};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Host over integer handles that logs every mutating call.
    #[derive(Default)]
    struct Log {
        next: Cell<u32>,
        calls: RefCell<Vec<String>>,
        deferred: RefCell<Vec<Task>>,
    }

    impl Log {
        fn push(&self, call: String) {
            self.calls.borrow_mut().push(call);
        }

        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.calls.borrow_mut())
        }
    }

    impl HostConfig for Log {
        type Container = ();
        type ContainerId = ();
        type Instance = u32;
        type PublicInstance = u32;
        type HostContext = u32;
        type UpdatePayload = ();

        const SUPPORTS_MICROTASKS: bool = true;

        fn container_id(&self, _container: &()) {}

        fn create_instance(
            &self,
            kind: &ElementKind,
            _props: &Props,
            _container: &(),
            ctx: &u32,
        ) -> Result<u32, HostError> {
            if kind.as_str() == "bad" {
                return Err(HostError::UnsupportedKind { kind: kind.clone() });
            }
            let id = self.next.get() + 1;
            self.next.set(id);
            self.push(format!("create {id} {kind} depth={ctx}"));
            Ok(id)
        }

        fn append_initial_child(&self, parent: &u32, child: &u32) {
            self.push(format!("initial {parent} {child}"));
        }

        fn child_host_context(&self, parent: &u32, _kind: &ElementKind, _props: &Props) -> u32 {
            parent + 1
        }

        fn prepare_update(
            &self,
            _instance: &u32,
            _kind: &ElementKind,
            old: &Props,
            new: &Props,
            _ctx: &u32,
        ) -> Option<()> {
            (old != new).then_some(())
        }

        fn should_set_text_content(&self, kind: &ElementKind, _props: &Props) -> bool {
            kind.as_str() == "label"
        }

        fn schedule_microtask(&self, task: Task) {
            self.deferred.borrow_mut().push(task);
        }

        fn prepare_for_commit(&self, _container: &()) {
            self.push("prepare".into());
        }

        fn reset_after_commit(&self, _container: &()) {
            self.push("reset".into());
        }

        fn append_child(&self, parent: &u32, child: &u32) {
            self.push(format!("append {parent} {child}"));
        }

        fn append_child_to_container(&self, _container: &(), child: &u32) {
            self.push(format!("append root {child}"));
        }

        fn insert_before(&self, parent: &u32, child: &u32, before: &u32) {
            self.push(format!("insert {parent} {child} before {before}"));
        }

        fn insert_in_container_before(&self, _container: &(), child: &u32, before: &u32) {
            self.push(format!("insert root {child} before {before}"));
        }

        fn remove_child(&self, parent: &u32, child: &u32) {
            self.push(format!("remove {parent} {child}"));
        }

        fn remove_child_from_container(&self, _container: &(), child: &u32) {
            self.push(format!("remove root {child}"));
        }

        fn commit_update(
            &self,
            instance: &u32,
            _payload: (),
            _kind: &ElementKind,
            _old: &Props,
            _new: &Props,
        ) {
            self.push(format!("update {instance}"));
        }

        fn hide_instance(&self, instance: &u32) {
            self.push(format!("hide {instance}"));
        }

        fn unhide_instance(&self, instance: &u32, _props: &Props) {
            self.push(format!("unhide {instance}"));
        }

        fn clear_container(&self, _container: &()) {
            self.push("clear".into());
        }

        fn reset_text_content(&self, instance: &u32) {
            self.push(format!("reset_text {instance}"));
        }
    }

    fn item(key: &str) -> Element {
        Element::new("item").with_key(key)
    }

    fn list(keys: &[&str]) -> Element {
        Element::new("list").with_children(keys.iter().map(|k| item(k)))
    }

    #[test]
    fn first_mount_builds_detached_then_attaches_once() {
        let engine = Reconciler::new(Log::default());
        let root = engine.create_container(&());
        let token = engine
            .update_container(Some(list(&["a", "b"])), &root, None)
            .unwrap();
        assert_eq!(
            engine.host().take(),
            vec![
                "create 1 list depth=0",
                "create 2 item depth=1",
                "initial 1 2",
                "create 3 item depth=1",
                "initial 1 3",
                "prepare",
                "clear",
                "append root 1",
                "reset",
            ]
        );
        assert_eq!(token.sequence, 1);
        assert_eq!(token.priority, EventPriority::Default);
        assert_eq!(token.stats.created, 3);
        assert_eq!(engine.public_children(&root), vec![1]);
        assert!(root.is_mounted());
    }

    #[test]
    fn identical_render_commits_nothing() {
        let engine = Reconciler::new(Log::default());
        let root = engine.create_container(&());
        engine.update_container(Some(list(&["a"])), &root, None).unwrap();
        engine.host().take();
        let token = engine.update_container(Some(list(&["a"])), &root, None).unwrap();
        assert_eq!(engine.host().take(), vec!["prepare", "reset"]);
        assert_eq!(token.stats, CommitStats::default());
        assert_eq!(token.sequence, 2);
    }

    #[test]
    fn keyed_move_inserts_before_next_stable_sibling() {
        let engine = Reconciler::new(Log::default());
        let root = engine.create_container(&());
        engine
            .update_container(Some(list(&["a", "b", "c"])), &root, None)
            .unwrap();
        engine.host().take();
        engine
            .update_container(Some(list(&["c", "a", "b"])), &root, None)
            .unwrap();
        // c stays (highest old index seen first); a and b move after it.
        assert_eq!(
            engine.host().take(),
            vec!["prepare", "append 1 2", "append 1 3", "reset"]
        );

        engine
            .update_container(Some(list(&["a", "c", "b"])), &root, None)
            .unwrap();
        assert_eq!(
            engine.host().take(),
            vec!["prepare", "insert 1 4 before 3", "reset"]
        );
    }

    #[test]
    fn removal_detaches_only_the_subtree_root() {
        let engine = Reconciler::new(Log::default());
        let root = engine.create_container(&());
        let tree = Element::new("list")
            .with_child(item("keep"))
            .with_child(item("drop").with_child(Element::new("leaf")));
        engine.update_container(Some(tree), &root, None).unwrap();
        engine.host().take();
        engine
            .update_container(Some(list(&["keep"])), &root, None)
            .unwrap();
        assert_eq!(engine.host().take(), vec!["prepare", "remove 1 3", "reset"]);
    }

    #[test]
    fn kind_change_recreates_in_place() {
        let engine = Reconciler::new(Log::default());
        let root = engine.create_container(&());
        engine
            .update_container(Some(list(&["a", "b"])), &root, None)
            .unwrap();
        engine.host().take();
        let swapped = Element::new("list")
            .with_child(Element::new("other").with_key("a"))
            .with_child(item("b"));
        engine.update_container(Some(swapped), &root, None).unwrap();
        assert_eq!(
            engine.host().take(),
            vec![
                "create 4 other depth=1",
                "prepare",
                "remove 1 2",
                "insert 1 4 before 3",
                "reset",
            ]
        );
    }

    #[test]
    fn host_error_leaves_committed_tree_alone() {
        let engine = Reconciler::new(Log::default());
        let root = engine.create_container(&());
        engine.update_container(Some(list(&["a"])), &root, None).unwrap();
        engine.host().take();

        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        let broken = Element::new("list")
            .with_child(item("a"))
            .with_child(Element::new("bad"));
        let err = engine
            .update_container(Some(broken), &root, Some(Box::new(move || flag.set(true))))
            .unwrap_err();
        assert!(matches!(err, ReconcileError::Host(HostError::UnsupportedKind { .. })));
        assert!(engine.host().take().is_empty());
        assert!(!ran.get());
        assert!(engine.host().deferred.borrow().is_empty());
        assert_eq!(root.commits(), 1);

        engine
            .update_container(Some(list(&["a", "b"])), &root, None)
            .unwrap();
        assert_eq!(
            engine.host().take(),
            vec!["create 3 item depth=1", "prepare", "append 1 3", "reset"]
        );
    }

    #[test]
    fn only_committed_passes_take_a_sequence_number() {
        let engine = Reconciler::new(Log::default());
        let root = engine.create_container(&());
        let first = engine.update_container(Some(item("a")), &root, None).unwrap();
        assert_eq!(first.sequence, 1);

        let err = engine
            .update_container(Some(Element::new("bad")), &root, None)
            .unwrap_err();
        assert!(matches!(err, ReconcileError::Host(_)));

        let held = root.0.current.borrow();
        let err = engine.update_container(Some(item("a")), &root, None).unwrap_err();
        assert!(matches!(err, ReconcileError::Reentrant { .. }));
        drop(held);

        let next = engine.update_container(Some(item("a")), &root, None).unwrap();
        assert_eq!(next.sequence, 2);
        assert_eq!(root.commits(), 2);
    }

    #[test]
    fn hidden_flag_toggles_visibility() {
        let engine = Reconciler::new(Log::default());
        let root = engine.create_container(&());
        let shown = Element::new("list").with_child(item("a"));
        let hidden = Element::new("list").with_child(item("a").with_hidden(true));
        engine.update_container(Some(hidden.clone()), &root, None).unwrap();
        assert!(engine.host().take().contains(&"hide 2".to_owned()));
        engine.update_container(Some(shown), &root, None).unwrap();
        assert_eq!(engine.host().take(), vec!["prepare", "unhide 2", "reset"]);
        engine.update_container(Some(hidden), &root, None).unwrap();
        assert_eq!(engine.host().take(), vec!["prepare", "hide 2", "reset"]);
    }

    #[test]
    fn text_owning_kinds_skip_children() {
        let engine = Reconciler::new(Log::default());
        let root = engine.create_container(&());
        let el = Element::new("label").with_child(Element::new("bad"));
        engine.update_container(Some(el), &root, None).unwrap();
        assert_eq!(
            engine.host().take(),
            vec!["create 1 label depth=0", "prepare", "clear", "append root 1", "reset"]
        );
    }

    #[test]
    fn unmount_and_remount_clear_the_container() {
        let engine = Reconciler::new(Log::default());
        let root = engine.create_container(&());
        engine.update_container(Some(item("a")), &root, None).unwrap();
        engine.host().take();
        engine.update_container(None, &root, None).unwrap();
        assert_eq!(engine.host().take(), vec!["prepare", "remove root 1", "reset"]);
        assert!(!root.is_mounted());
        assert!(engine.public_children(&root).is_empty());
        engine.update_container(Some(item("a")), &root, None).unwrap();
        assert_eq!(
            engine.host().take(),
            vec!["create 2 item depth=0", "prepare", "clear", "append root 2", "reset"]
        );
    }

    #[test]
    fn completion_is_deferred_through_microtasks() {
        let engine = Reconciler::new(Log::default());
        let root = engine.create_container(&());
        let ran = Rc::new(Cell::new(0));
        let r = Rc::clone(&ran);
        engine
            .update_container(Some(item("a")), &root, Some(Box::new(move || r.set(r.get() + 1))))
            .unwrap();
        assert_eq!(ran.get(), 0);
        let tasks = std::mem::take(&mut *engine.host().deferred.borrow_mut());
        for task in tasks {
            task();
        }
        assert_eq!(ran.get(), 1);
    }

    #[test]
    fn root_handle_clones_share_identity() {
        let engine = Reconciler::new(Log::default());
        let a = engine.create_container(&());
        let b = engine.create_container(&());
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
    }
}
