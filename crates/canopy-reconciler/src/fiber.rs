// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reconciled tree nodes.

use canopy_host_port::{ElementKind, HostConfig, Key, Props};

/// One element that made it through a commit, paired with its live node.
pub(crate) struct Fiber<H: HostConfig> {
    pub(crate) kind: ElementKind,
    pub(crate) key: Option<Key>,
    pub(crate) props: Props,
    pub(crate) instance: H::Instance,
    pub(crate) children: Vec<Fiber<H>>,
    pub(crate) hidden: bool,
    /// The host set text content itself, so `children` stays empty.
    pub(crate) owns_text: bool,
}

impl<H: HostConfig> Fiber<H> {
    pub(crate) fn ident(&self, index: usize) -> Ident<'_> {
        Ident::of(self.key.as_ref(), index)
    }
}

/// Sibling identity: explicit key, or position for unkeyed elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Ident<'a> {
    Key(&'a Key),
    Index(usize),
}

impl<'a> Ident<'a> {
    pub(crate) fn of(key: Option<&'a Key>, index: usize) -> Self {
        key.map_or(Self::Index(index), Self::Key)
    }
}
