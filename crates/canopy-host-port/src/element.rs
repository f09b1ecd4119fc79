// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Element descriptions: what the application wants to exist.
//!
//! Elements are immutable values produced fresh on every render pass. The
//! adapter only ever sees them by shared reference.

use core::fmt;
use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Discriminated node kind tag (e.g. `"rectangle"`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementKind(Cow<'static, str>);

impl ElementKind {
    /// Tag from a static string.
    pub const fn from_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    /// Tag from any string.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Cow::Owned(tag.into()))
    }

    /// The tag text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ElementKind {
    fn from(tag: &'static str) -> Self {
        Self::from_static(tag)
    }
}

impl From<String> for ElementKind {
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}

/// A single property value.
///
/// Colors are carried as numbers (0xRRGGBB) and read back through
/// [`Props::color`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    /// Boolean flag.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// String value.
    Text(String),
}

impl PropValue {
    /// Value equality with numbers compared bit for bit, so a `NaN` prop
    /// equals itself across renders.
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<f32> for PropValue {
    fn from(v: f32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<i32> for PropValue {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<u32> for PropValue {
    fn from(v: u32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Ordered property mapping.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Props(BTreeMap<String, PropValue>);

impl Props {
    /// Empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Raw value for `name`.
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.0.get(name)
    }

    /// Whether `name` is set.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Numeric value for `name`; other variants read as unset.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.0.get(name) {
            Some(PropValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// String value for `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(PropValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Boolean value for `name`.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.0.get(name) {
            Some(PropValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Color for `name`, accepting integral numbers in `0..=0xFFFFFF`.
    #[allow(clippy::cast_sign_loss)]
    pub fn color(&self, name: &str) -> Option<u32> {
        self.number(name)
            .filter(|n| n.fract() == 0.0 && (0.0..=f64::from(0x00FF_FFFF_u32)).contains(n))
            .map(|n| n as u32)
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no property is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Props
where
    K: Into<String>,
    V: Into<PropValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Explicit reconciliation key, stable across renders.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    /// The key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(k: &str) -> Self {
        Self(k.to_owned())
    }
}

impl From<String> for Key {
    fn from(k: String) -> Self {
        Self(k)
    }
}

impl From<u64> for Key {
    fn from(k: u64) -> Self {
        Self(k.to_string())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Description of one node and its subtree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<Key>,
    #[serde(default)]
    props: Props,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Element>,
    #[serde(default, skip_serializing_if = "is_false")]
    hidden: bool,
}

impl Element {
    /// Element with no props and no children.
    pub fn new(kind: impl Into<ElementKind>) -> Self {
        Self {
            kind: kind.into(),
            key: None,
            props: Props::new(),
            children: Vec::new(),
            hidden: false,
        }
    }

    /// Set the reconciliation key.
    pub fn with_key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set one property.
    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props = self.props.with(name, value);
        self
    }

    /// Replace all properties.
    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    /// Append one child.
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Mark the subtree as hidden (suspended) while keeping it mounted.
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Kind tag.
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Reconciliation key, if any.
    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    /// Properties.
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Child descriptions in order.
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Whether the subtree is hidden.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_as_compares_numbers_by_bits() {
        let nan = PropValue::Number(f64::NAN);
        assert!(nan.same_as(&nan.clone()));
        assert!(!PropValue::Number(0.0).same_as(&PropValue::Number(-0.0)));
        assert!(PropValue::from("a").same_as(&PropValue::from("a")));
        assert!(!PropValue::from(1).same_as(&PropValue::from(true)));
    }

    #[test]
    fn color_rejects_fractional_and_out_of_range() {
        let props = Props::new()
            .with("a", 0x336699)
            .with("b", 1.5)
            .with("c", -1)
            .with("d", "red");
        assert_eq!(props.color("a"), Some(0x336699));
        assert_eq!(props.color("b"), None);
        assert_eq!(props.color("c"), None);
        assert_eq!(props.color("d"), None);
        assert_eq!(props.color("missing"), None);
    }

    #[test]
    fn typed_getters_ignore_other_variants() {
        let props = Props::new().with("x", 3).with("on", true).with("t", "hi");
        assert_eq!(props.number("x"), Some(3.0));
        assert_eq!(props.number("t"), None);
        assert_eq!(props.flag("on"), Some(true));
        assert_eq!(props.text("t"), Some("hi"));
    }

    #[test]
    fn element_parses_from_json() {
        let json = r#"{
            "kind": "container",
            "props": { "x": 4 },
            "children": [
                { "kind": "rectangle", "key": "a", "props": { "width": 10, "fill": 255 } },
                { "kind": "label", "props": { "text": "hi" }, "hidden": true }
            ]
        }"#;
        let el: Element = serde_json::from_str(json).unwrap();
        assert_eq!(el.kind().as_str(), "container");
        assert_eq!(el.props().number("x"), Some(4.0));
        assert_eq!(el.children().len(), 2);
        assert_eq!(el.children()[0].key(), Some(&Key::from("a")));
        assert_eq!(el.children()[0].props().color("fill"), Some(255));
        assert!(el.children()[1].is_hidden());
        assert_eq!(el.children()[1].props().text("text"), Some("hi"));
    }

    #[test]
    fn owned_and_static_kinds_compare_equal() {
        assert_eq!(
            ElementKind::from_static("rectangle"),
            ElementKind::new(String::from("rectangle"))
        );
    }
}
