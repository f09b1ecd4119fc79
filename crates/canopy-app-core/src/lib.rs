// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for Canopy renderers (config, prefs).
//! Keeps host adapters free of storage concerns.

pub mod config;
pub mod prefs;
