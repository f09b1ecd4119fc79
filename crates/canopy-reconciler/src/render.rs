// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Render phase: diff an element tree against the committed fibers.
//!
//! The pass never touches a live node. It reads the current tree, builds a
//! replacement tree plus an [`Effects`] list, and either hands both back or
//! fails with the current tree untouched. Nodes created for a failed pass are
//! dropped without notifying the host.

use std::collections::HashMap;

use canopy_host_port::{Element, HostConfig, HostError};

use crate::commit::{Deletion, Effects, Mount, Parent, Placement, Update, Visibility};
use crate::fiber::{Fiber, Ident};

pub(crate) struct RenderPass<'h, H: HostConfig> {
    host: &'h H,
    container: &'h H::Container,
    effects: Effects<H>,
}

impl<'h, H: HostConfig> RenderPass<'h, H> {
    pub(crate) fn new(host: &'h H, container: &'h H::Container) -> Self {
        Self {
            host,
            container,
            effects: Effects::default(),
        }
    }

    /// Diff `element` against the committed top level.
    pub(crate) fn run(
        mut self,
        current: &[Fiber<H>],
        element: Option<&Element>,
    ) -> Result<(Vec<Fiber<H>>, Effects<H>), HostError> {
        let ctx = self.host.root_host_context(self.container);
        let elements = element.map_or(&[][..], std::slice::from_ref);
        let next = self.reconcile_children(&Parent::Container, current, elements, &ctx)?;
        self.effects.clear_container = current.is_empty() && !next.is_empty();
        Ok((next, self.effects))
    }

    fn reconcile_children(
        &mut self,
        parent: &Parent<H>,
        old: &[Fiber<H>],
        elements: &[Element],
        ctx: &H::HostContext,
    ) -> Result<Vec<Fiber<H>>, HostError> {
        let mut remaining: HashMap<Ident<'_>, usize> = old
            .iter()
            .enumerate()
            .map(|(i, fiber)| (fiber.ident(i), i))
            .collect();
        let mut reused = vec![false; old.len()];
        let mut next = Vec::with_capacity(elements.len());
        let mut moved = Vec::with_capacity(elements.len());
        let mut last_placed = 0;

        for (i, element) in elements.iter().enumerate() {
            let matched = remaining
                .remove(&Ident::of(element.key(), i))
                .filter(|&oi| old[oi].kind == *element.kind());
            match matched {
                Some(oi) => {
                    reused[oi] = true;
                    next.push(self.update_fiber(&old[oi], element, ctx)?);
                    if oi < last_placed {
                        moved.push(true);
                    } else {
                        last_placed = oi;
                        moved.push(false);
                    }
                }
                None => {
                    next.push(self.create_fiber(element, ctx)?);
                    moved.push(true);
                }
            }
        }

        for (fiber, kept) in old.iter().zip(reused) {
            if !kept {
                self.effects.deletions.push(Deletion {
                    parent: parent.clone(),
                    instance: fiber.instance.clone(),
                });
            }
        }

        // Anchor each placement on the next sibling that stays put.
        let mut anchor = None;
        let mut placements = Vec::new();
        for (fiber, &needs_placement) in next.iter().zip(&moved).rev() {
            if needs_placement {
                placements.push(Placement {
                    parent: parent.clone(),
                    instance: fiber.instance.clone(),
                    before: anchor.clone(),
                });
            } else {
                anchor = Some(fiber.instance.clone());
            }
        }
        self.effects.placements.extend(placements.into_iter().rev());

        Ok(next)
    }

    fn update_fiber(
        &mut self,
        old: &Fiber<H>,
        element: &Element,
        ctx: &H::HostContext,
    ) -> Result<Fiber<H>, HostError> {
        let kind = element.kind();
        let props = element.props();

        if let Some(payload) = self
            .host
            .prepare_update(&old.instance, kind, &old.props, props, ctx)
        {
            self.effects.updates.push(Update {
                instance: old.instance.clone(),
                payload,
                kind: kind.clone(),
                old: old.props.clone(),
                new: props.clone(),
            });
        }

        let owns_text = self.host.should_set_text_content(kind, props);
        let here = Parent::Node(old.instance.clone());
        let children = if owns_text {
            for child in &old.children {
                self.effects.deletions.push(Deletion {
                    parent: here.clone(),
                    instance: child.instance.clone(),
                });
            }
            Vec::new()
        } else {
            if old.owns_text {
                self.effects.text_resets.push(old.instance.clone());
            }
            let child_ctx = self.host.child_host_context(ctx, kind, props);
            self.reconcile_children(&here, &old.children, element.children(), &child_ctx)?
        };

        match (old.hidden, element.is_hidden()) {
            (false, true) => self
                .effects
                .visibility
                .push(Visibility::Hide(old.instance.clone())),
            (true, false) => self
                .effects
                .visibility
                .push(Visibility::Unhide(old.instance.clone(), props.clone())),
            _ => {}
        }

        Ok(Fiber {
            kind: kind.clone(),
            key: element.key().cloned(),
            props: props.clone(),
            instance: old.instance.clone(),
            children,
            hidden: element.is_hidden(),
            owns_text,
        })
    }

    /// Build a detached subtree for `element`.
    fn create_fiber(
        &mut self,
        element: &Element,
        ctx: &H::HostContext,
    ) -> Result<Fiber<H>, HostError> {
        let kind = element.kind();
        let props = element.props();
        let instance = self
            .host
            .create_instance(kind, props, self.container, ctx)?;
        self.effects.created += 1;

        let owns_text = self.host.should_set_text_content(kind, props);
        let mut children = Vec::new();
        if !owns_text {
            let child_ctx = self.host.child_host_context(ctx, kind, props);
            children.reserve(element.children().len());
            for child in element.children() {
                let fiber = self.create_fiber(child, &child_ctx)?;
                self.host.append_initial_child(&instance, &fiber.instance);
                children.push(fiber);
            }
        }

        if self
            .host
            .finalize_initial_children(&instance, kind, props, ctx)
        {
            self.effects.mounts.push(Mount {
                instance: instance.clone(),
                kind: kind.clone(),
                props: props.clone(),
            });
        }
        if element.is_hidden() {
            self.effects
                .visibility
                .push(Visibility::Hide(instance.clone()));
        }

        Ok(Fiber {
            kind: kind.clone(),
            key: element.key().cloned(),
            props: props.clone(),
            instance,
            children,
            hidden: element.is_hidden(),
            owns_text,
        })
    }
}
