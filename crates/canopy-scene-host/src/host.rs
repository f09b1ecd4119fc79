// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `HostConfig` implementation over `canopy-scene`.

use canopy_app_core::prefs::RendererPrefs;
use canopy_host_port::{
    ContractViolation, ElementKind, EventPriority, HostConfig, HostError, HostOp, PropValue, Props,
    HOST_TARGET,
};
use canopy_scene::{
    draw_rectangle, label, rectangle, RectStyle, SceneError, SceneNode, Stage, StageId,
    TextContent,
};

use crate::context::SceneContext;
use crate::event::{EventSource, InputEvent};
use crate::kinds::{SceneKind, ALPHA, FILL, FONT_SIZE, HEIGHT, TEXT, WIDTH, X, Y};
use crate::patch::{PropChange, ScenePatch};

/// Host adapter building [`SceneNode`]s under a [`Stage`].
#[derive(Debug, Default)]
pub struct SceneHost {
    prefs: RendererPrefs,
    events: EventSource,
}

impl SceneHost {
    /// Adapter with default preferences.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapter with explicit preferences.
    pub fn with_prefs(prefs: RendererPrefs) -> Self {
        Self {
            prefs,
            events: EventSource::new(),
        }
    }

    /// Share an event slot with the window glue.
    pub fn with_events(mut self, events: EventSource) -> Self {
        self.events = events;
        self
    }

    /// Active preferences.
    pub fn prefs(&self) -> &RendererPrefs {
        &self.prefs
    }

    /// Slot the window glue writes the dispatching event into.
    pub fn events(&self) -> &EventSource {
        &self.events
    }

    fn rect_style(&self, props: &Props) -> RectStyle {
        RectStyle {
            width: number_or(props, WIDTH, self.prefs.default_width),
            height: number_or(props, HEIGHT, self.prefs.default_height),
            fill: props.color(FILL).unwrap_or(self.prefs.default_fill),
            fill_alpha: 1.0,
        }
    }

    fn text_content(&self, props: &Props, ctx: &SceneContext) -> TextContent {
        TextContent {
            text: props.text(TEXT).unwrap_or_default().to_owned(),
            font_size: number_or(props, FONT_SIZE, self.prefs.default_font_size),
            fill: props.color(FILL).unwrap_or(self.prefs.default_fill),
            resolution: ctx.resolution,
        }
    }

    fn place(&self, node: &SceneNode, props: &Props) {
        node.set_position(number_or(props, X, 0.0), number_or(props, Y, 0.0));
        node.set_alpha(number_or(props, ALPHA, self.prefs.default_alpha));
    }
}

fn number_or(props: &Props, name: &str, default: f32) -> f32 {
    props
        .number(name)
        .filter(|n| n.is_finite())
        .map_or(default, |n| n as f32)
}

fn change_number(change: &PropChange, default: f32) -> f32 {
    match change {
        PropChange::Set(_, PropValue::Number(n)) if n.is_finite() => *n as f32,
        _ => default,
    }
}

fn ensure(op: HostOp, result: Result<(), SceneError>) {
    if let Err(err) = result {
        ContractViolation::new(op, err.to_string()).raise();
    }
}

impl HostConfig for SceneHost {
    type Container = Stage;
    type ContainerId = StageId;
    type Instance = SceneNode;
    type PublicInstance = SceneNode;
    type HostContext = SceneContext;
    type UpdatePayload = ScenePatch;

    fn container_id(&self, container: &Stage) -> StageId {
        container.id()
    }

    fn create_instance(
        &self,
        kind: &ElementKind,
        props: &Props,
        _container: &Stage,
        ctx: &SceneContext,
    ) -> Result<SceneNode, HostError> {
        let node = match SceneKind::parse(kind)? {
            SceneKind::Container => SceneNode::group(),
            SceneKind::Rectangle => rectangle(&self.rect_style(props)),
            SceneKind::Label => label(self.text_content(props, ctx)),
        };
        self.place(&node, props);
        Ok(node)
    }

    fn append_initial_child(&self, parent: &SceneNode, child: &SceneNode) {
        ensure(HostOp::AppendInitialChild, parent.add_child(child));
    }

    fn prepare_update(
        &self,
        _instance: &SceneNode,
        kind: &ElementKind,
        old: &Props,
        new: &Props,
        _ctx: &SceneContext,
    ) -> Option<ScenePatch> {
        ScenePatch::diff(SceneKind::parse(kind).ok()?, old, new)
    }

    fn should_set_text_content(&self, kind: &ElementKind, _props: &Props) -> bool {
        matches!(SceneKind::parse(kind), Ok(SceneKind::Label))
    }

    fn root_host_context(&self, container: &Stage) -> SceneContext {
        SceneContext {
            resolution: container.resolution(),
            ..SceneContext::default()
        }
    }

    fn child_host_context(
        &self,
        parent: &SceneContext,
        kind: &ElementKind,
        props: &Props,
    ) -> SceneContext {
        match SceneKind::parse(kind) {
            Ok(SceneKind::Container) => parent.descend_into_group(props),
            _ => parent.descend(),
        }
    }

    fn current_event_priority(&self) -> EventPriority {
        self.events
            .current()
            .map_or(EventPriority::Default, InputEvent::priority)
    }

    fn append_child(&self, parent: &SceneNode, child: &SceneNode) {
        ensure(HostOp::AppendChild, parent.add_child(child));
    }

    fn append_child_to_container(&self, container: &Stage, child: &SceneNode) {
        ensure(HostOp::AppendChildToContainer, container.root().add_child(child));
    }

    fn insert_before(&self, parent: &SceneNode, child: &SceneNode, before: &SceneNode) {
        ensure(HostOp::InsertBefore, parent.insert_before(child, before));
    }

    fn insert_in_container_before(&self, container: &Stage, child: &SceneNode, before: &SceneNode) {
        ensure(HostOp::InsertInContainerBefore, container.root().insert_before(child, before));
    }

    fn remove_child(&self, parent: &SceneNode, child: &SceneNode) {
        ensure(HostOp::RemoveChild, parent.remove_child(child));
    }

    fn remove_child_from_container(&self, container: &Stage, child: &SceneNode) {
        ensure(HostOp::RemoveChildFromContainer, container.root().remove_child(child));
    }

    fn commit_update(
        &self,
        instance: &SceneNode,
        payload: ScenePatch,
        kind: &ElementKind,
        _old: &Props,
        new: &Props,
    ) {
        let kind = match SceneKind::parse(kind) {
            Ok(kind) => kind,
            Err(err) => ContractViolation::new(HostOp::CommitUpdate, err.to_string()).raise(),
        };
        let redraw = kind == SceneKind::Rectangle && payload.touches_any(&[WIDTH, HEIGHT, FILL]);
        let retext = kind == SceneKind::Label && payload.touches_any(&[TEXT, FONT_SIZE, FILL]);
        for change in payload.into_changes() {
            match change.name() {
                X => {
                    let [_, y] = instance.position();
                    instance.set_position(change_number(&change, 0.0), y);
                }
                Y => {
                    let [x, _] = instance.position();
                    instance.set_position(x, change_number(&change, 0.0));
                }
                ALPHA => instance.set_alpha(change_number(&change, self.prefs.default_alpha)),
                _ => {}
            }
        }
        if redraw {
            let style = self.rect_style(new);
            if instance.update_graphics(|g| draw_rectangle(g, &style)).is_none() {
                ContractViolation::new(HostOp::CommitUpdate, format!("{instance:?} is not a rectangle"))
                    .raise();
            }
        }
        if retext {
            let content = self.text_content(new, &SceneContext::default());
            let applied = instance.update_text(|t| {
                t.text = content.text;
                t.font_size = content.font_size;
                t.fill = content.fill;
            });
            if applied.is_none() {
                ContractViolation::new(HostOp::CommitUpdate, format!("{instance:?} is not a label"))
                    .raise();
            }
        }
    }

    fn hide_instance(&self, instance: &SceneNode) {
        instance.set_visible(false);
    }

    fn unhide_instance(&self, instance: &SceneNode, _props: &Props) {
        instance.set_visible(true);
    }

    fn clear_container(&self, container: &Stage) {
        let removed = container.root().remove_children();
        tracing::debug!(
            target: HOST_TARGET,
            stage = %container.id(), removed = removed.len(),
            "cleared container"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{CONTAINER, LABEL, RECTANGLE};
    use canopy_scene::DrawCommand;

    fn rect_props() -> Props {
        Props::new().with(X, 0).with(Y, 0).with(WIDTH, 50).with(HEIGHT, 50)
    }

    #[test]
    fn rectangle_gets_default_dimensions() {
        let host = SceneHost::new();
        let stage = Stage::new(200, 200);
        let ctx = host.root_host_context(&stage);
        let node = host
            .create_instance(&RECTANGLE, &Props::new().with(X, 3), &stage, &ctx)
            .unwrap();
        let g = node.graphics().unwrap();
        assert!(g.commands().contains(&DrawCommand::DrawRect {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0
        }));
        assert_eq!(node.position(), [3.0, 0.0]);
        assert!(node.parent().is_none());
    }

    #[test]
    fn unknown_kind_fails_without_touching_the_stage() {
        let host = SceneHost::new();
        let stage = Stage::new(10, 10);
        let err = host
            .create_instance(
                &ElementKind::from_static("hexagon"),
                &Props::new(),
                &stage,
                &SceneContext::default(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            HostError::UnsupportedKind {
                kind: ElementKind::from_static("hexagon")
            }
        );
        assert!(stage.frame().is_empty());
    }

    #[test]
    fn commit_update_moves_without_redraw() {
        let host = SceneHost::new();
        let stage = Stage::new(100, 100);
        let ctx = SceneContext::default();
        let old = rect_props();
        let node = host.create_instance(&RECTANGLE, &old, &stage, &ctx).unwrap();
        let new = old.clone().with(X, 10);
        let patch = host.prepare_update(&node, &RECTANGLE, &old, &new, &ctx).unwrap();
        assert_eq!(node.position(), [0.0, 0.0]);
        host.commit_update(&node, patch, &RECTANGLE, &old, &new);
        assert_eq!(node.position(), [10.0, 0.0]);
        assert_eq!(node.graphics().unwrap().generation(), 1);
    }

    #[test]
    fn commit_update_redraws_geometry_once() {
        let host = SceneHost::new();
        let stage = Stage::new(100, 100);
        let ctx = SceneContext::default();
        let old = rect_props();
        let node = host.create_instance(&RECTANGLE, &old, &stage, &ctx).unwrap();
        let new = old.clone().with(WIDTH, 80).with(FILL, 0x00ff00);
        let patch = host.prepare_update(&node, &RECTANGLE, &old, &new, &ctx).unwrap();
        host.commit_update(&node, patch, &RECTANGLE, &old, &new);
        let g = node.graphics().unwrap();
        assert_eq!(g.generation(), 2);
        assert_eq!(g.bounds().unwrap().width, 80.0);
        assert!(g.commands().contains(&DrawCommand::BeginFill {
            color: 0x00ff00,
            alpha: 1.0
        }));
    }

    #[test]
    fn unset_dimension_reverts_to_default() {
        let host = SceneHost::new();
        let stage = Stage::new(100, 100);
        let ctx = SceneContext::default();
        let old = rect_props();
        let node = host.create_instance(&RECTANGLE, &old, &stage, &ctx).unwrap();
        let new = Props::new().with(X, 0).with(Y, 0).with(HEIGHT, 50);
        let patch = host.prepare_update(&node, &RECTANGLE, &old, &new, &ctx).unwrap();
        host.commit_update(&node, patch, &RECTANGLE, &old, &new);
        assert_eq!(node.graphics().unwrap().bounds().unwrap().width, 100.0);
    }

    #[test]
    fn labels_own_their_text() {
        let host = SceneHost::new();
        let stage = Stage::new(100, 100).with_resolution(2.0);
        let ctx = host.root_host_context(&stage);
        let props = Props::new().with(TEXT, "hello");
        assert!(host.should_set_text_content(&LABEL, &props));
        assert!(!host.should_set_text_content(&RECTANGLE, &props));
        let node = host.create_instance(&LABEL, &props, &stage, &ctx).unwrap();
        let text = node.text().unwrap();
        assert_eq!(text.text, "hello");
        assert!((text.resolution - 2.0).abs() < f32::EPSILON);

        let new = Props::new().with(TEXT, "bye");
        let patch = host.prepare_update(&node, &LABEL, &props, &new, &ctx).unwrap();
        host.commit_update(&node, patch, &LABEL, &props, &new);
        assert_eq!(node.text().unwrap().text, "bye");
        assert!((node.text().unwrap().resolution - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn container_context_offsets_children() {
        let host = SceneHost::new();
        let stage = Stage::new(100, 100);
        let root = host.root_host_context(&stage);
        let child = host.child_host_context(&root, &CONTAINER, &Props::new().with(X, 7));
        assert_eq!(child.origin, [7.0, 0.0]);
        assert_eq!(child.depth, 1);
        assert_eq!(root.depth, 0);
    }

    #[test]
    fn leaf_contexts_only_deepen() {
        let host = SceneHost::new();
        let stage = Stage::new(100, 100);
        let root = host.root_host_context(&stage);
        let placed = Props::new().with(X, 7).with(Y, 3);
        for kind in [&RECTANGLE, &LABEL] {
            let child = host.child_host_context(&root, kind, &placed);
            assert_eq!(child.origin, [0.0, 0.0], "{kind}");
            assert_eq!(child.depth, 1, "{kind}");
        }
    }

    #[test]
    fn nan_prop_rerender_needs_no_update() {
        let host = SceneHost::new();
        let stage = Stage::new(100, 100);
        let ctx = SceneContext::default();
        let props = rect_props().with(X, f64::NAN);
        let node = host.create_instance(&RECTANGLE, &props, &stage, &ctx).unwrap();
        assert_eq!(node.position(), [0.0, 0.0]);
        assert_eq!(
            host.prepare_update(&node, &RECTANGLE, &props, &props.clone(), &ctx),
            None
        );
    }

    #[test]
    fn priority_follows_active_event() {
        let host = SceneHost::new();
        assert_eq!(host.current_event_priority(), EventPriority::Default);
        let p = host
            .events()
            .dispatch(InputEvent::PointerDown, || host.current_event_priority());
        assert_eq!(p, EventPriority::Discrete);
    }

    #[test]
    fn hide_keeps_node_attached() {
        let host = SceneHost::new();
        let stage = Stage::new(100, 100);
        let ctx = SceneContext::default();
        let node = host.create_instance(&RECTANGLE, &rect_props(), &stage, &ctx).unwrap();
        host.append_child_to_container(&stage, &node);
        host.hide_instance(&node);
        assert!(stage.frame().is_empty());
        assert_eq!(node.parent(), Some(stage.root().clone()));
        host.unhide_instance(&node, &rect_props());
        assert_eq!(stage.frame().len(), 1);
    }

    #[test]
    fn clear_container_removes_everything() {
        let host = SceneHost::new();
        let stage = Stage::new(100, 100);
        let ctx = SceneContext::default();
        for _ in 0..3 {
            let node = host.create_instance(&RECTANGLE, &rect_props(), &stage, &ctx).unwrap();
            host.append_child_to_container(&stage, &node);
        }
        host.clear_container(&stage);
        assert_eq!(stage.root().child_count(), 0);
    }

    #[test]
    #[should_panic(expected = "remove_child")]
    fn removing_a_foreign_node_is_a_contract_violation() {
        let host = SceneHost::new();
        let parent = SceneNode::group();
        let stranger = SceneNode::group();
        host.remove_child(&parent, &stranger);
    }
}
