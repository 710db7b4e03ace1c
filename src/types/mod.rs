// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed models for the agents.kruise.io custom resources.

pub mod common;
pub mod sandbox;
pub mod sandboxclaim;
pub mod sandboxset;

pub use common::{Condition, HasConditions, TemplateRef};
pub use sandbox::{PodInfo, Sandbox, SandboxPhase, SandboxSpec, SandboxStatus};
pub use sandboxclaim::{SandboxClaim, SandboxClaimPhase, SandboxClaimSpec, SandboxClaimStatus};
pub use sandboxset::{SandboxSet, SandboxSetSpec, SandboxSetStatus};
