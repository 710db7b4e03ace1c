// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-kind clients for the agents resources.

pub mod resource;
pub mod sandbox;
pub mod sandboxclaim;
pub mod sandboxset;

pub use resource::{AgentsResource, ResourceClient};
pub use sandbox::SandboxClient;
pub use sandboxclaim::SandboxClaimClient;
pub use sandboxset::SandboxSetClient;
