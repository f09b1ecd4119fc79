// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Update payloads: the diff between two prop sets.

use canopy_host_port::{PropValue, Props};

use crate::kinds::SceneKind;

/// One changed prop.
#[derive(Clone, Debug, PartialEq)]
pub enum PropChange {
    /// Prop newly set or changed to this value.
    Set(String, PropValue),
    /// Prop removed; the node falls back to its default.
    Unset(String),
}

impl PropChange {
    /// Name of the changed prop.
    pub fn name(&self) -> &str {
        match self {
            Self::Set(name, _) | Self::Unset(name) => name,
        }
    }
}

/// Changed props a commit must apply, in name order.
///
/// Built during the render phase and consumed by value in the commit phase.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenePatch {
    changes: Vec<PropChange>,
}

impl ScenePatch {
    /// Diff the props `kind` reads. `None` when nothing relevant changed.
    pub fn diff(kind: SceneKind, old: &Props, new: &Props) -> Option<Self> {
        let mut changes: Vec<PropChange> = kind
            .props()
            .iter()
            .filter_map(|&name| match (old.get(name), new.get(name)) {
                (Some(before), Some(after)) if before.same_as(after) => None,
                (None, None) => None,
                (_, Some(after)) => Some(PropChange::Set(name.to_owned(), after.clone())),
                (Some(_), None) => Some(PropChange::Unset(name.to_owned())),
            })
            .collect();
        if changes.is_empty() {
            return None;
        }
        changes.sort_by(|a, b| a.name().cmp(b.name()));
        Some(Self { changes })
    }

    /// Changes in name order.
    pub fn changes(&self) -> &[PropChange] {
        &self.changes
    }

    /// Change for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&PropChange> {
        self.changes.iter().find(|c| c.name() == name)
    }

    /// Whether any of `names` changed.
    pub fn touches_any(&self, names: &[&str]) -> bool {
        self.changes.iter().any(|c| names.contains(&c.name()))
    }

    pub(crate) fn into_changes(self) -> Vec<PropChange> {
        self.changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{FILL, WIDTH, X, Y};

    #[test]
    fn equal_props_need_no_patch() {
        let props = Props::new().with(X, 0).with(WIDTH, 50);
        assert_eq!(ScenePatch::diff(SceneKind::Rectangle, &props, &props), None);
    }

    #[test]
    fn only_changed_props_are_carried() {
        let old = Props::new().with(X, 0).with(Y, 0).with(WIDTH, 50);
        let new = Props::new().with(X, 10).with(Y, 0).with(WIDTH, 50);
        let patch = ScenePatch::diff(SceneKind::Rectangle, &old, &new).unwrap();
        assert_eq!(
            patch.changes(),
            &[PropChange::Set(X.into(), PropValue::Number(10.0))]
        );
    }

    #[test]
    fn nan_equals_itself_across_renders() {
        let props = Props::new().with(X, f64::NAN).with(WIDTH, 50);
        assert_eq!(ScenePatch::diff(SceneKind::Rectangle, &props, &props.clone()), None);
    }

    #[test]
    fn signed_zero_change_is_carried() {
        let old = Props::new().with(X, 0.0);
        let new = Props::new().with(X, -0.0);
        assert!(ScenePatch::diff(SceneKind::Rectangle, &old, &new).is_some());
    }

    #[test]
    fn removed_props_are_unset() {
        let old = Props::new().with(FILL, 0xff0000);
        let patch = ScenePatch::diff(SceneKind::Rectangle, &old, &Props::new()).unwrap();
        assert_eq!(patch.get(FILL), Some(&PropChange::Unset(FILL.into())));
    }

    #[test]
    fn props_outside_the_kind_are_ignored() {
        let old = Props::new().with("onClick", "a");
        let new = Props::new().with("onClick", "b").with(WIDTH, 3);
        assert_eq!(ScenePatch::diff(SceneKind::Container, &old, &new), None);
    }
}
