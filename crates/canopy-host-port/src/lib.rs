// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Host-adapter contract for Canopy renderers.
//!
//! This crate defines the boundary between a tree reconciliation engine and
//! the renderer target it drives. It contains no scene-graph code.
//!
//! # Design Principles
//!
//! - **Two phases**: Render-phase operations are pure and may be discarded;
//!   commit-phase operations mutate the live tree and run only after a render
//!   pass succeeded as a whole.
//! - **Creation is the only failure**: An unknown element kind aborts the
//!   pass. Every other operation is total over well-formed input.
//! - **Opaque payloads**: Update payloads and host contexts are adapter
//!   types the engine forwards unchanged.

use thiserror::Error;

mod element;
mod engine;
mod host;
mod traced;

pub use element::{Element, ElementKind, Key, PropValue, Props};
pub use engine::{Completion, Engine};
pub use host::{EventPriority, HostConfig, HostOp, Phase, Task, TimeoutId};
pub use traced::{OperationRecord, OperationSink, RecordingSink, Traced, TracingSink};

/// Log target for contract-level events.
pub const HOST_TARGET: &str = "canopy::host";

/// Recoverable adapter failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The element kind tag is not one the adapter knows how to build.
    #[error("unsupported element kind `{kind}`")]
    UnsupportedKind {
        /// The rejected tag.
        kind: ElementKind,
    },
}

/// A commit-phase call referenced a node the adapter never created or
/// already removed.
///
/// This is a programming error in the integration. Adapters surface it with
/// [`ContractViolation::raise`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("host contract violated in `{op}`: {detail}")]
pub struct ContractViolation {
    /// Operation that received the bad reference.
    pub op: HostOp,
    /// What was wrong with it.
    pub detail: String,
}

impl ContractViolation {
    /// Describe a violation.
    pub fn new(op: HostOp, detail: impl Into<String>) -> Self {
        Self {
            op,
            detail: detail.into(),
        }
    }

    /// Log the violation and abort the current thread.
    #[allow(clippy::panic)]
    pub fn raise(self) -> ! {
        tracing::error!(target: HOST_TARGET, op = %self.op, detail = %self.detail, "contract violation");
        panic!("{self}")
    }
}
