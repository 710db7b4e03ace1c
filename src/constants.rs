// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// API group shared by every agents resource
pub const API_GROUP: &str = "agents.kruise.io";
/// Served version of the agents API
pub const API_VERSION: &str = "v1alpha1";
/// `apiVersion` value written on every object this crate creates
pub const GROUP_VERSION: &str = "agents.kruise.io/v1alpha1";

/// Resource kinds and their REST plurals
pub mod kinds {
    pub const SANDBOX: &str = "Sandbox";
    pub const SANDBOX_PLURAL: &str = "sandboxes";
    pub const SANDBOX_SET: &str = "SandboxSet";
    pub const SANDBOX_SET_PLURAL: &str = "sandboxsets";
    pub const SANDBOX_CLAIM: &str = "SandboxClaim";
    pub const SANDBOX_CLAIM_PLURAL: &str = "sandboxclaims";

    /// Every kind served under the agents group/version
    pub const ALL: [&str; 3] = [SANDBOX, SANDBOX_SET, SANDBOX_CLAIM];
}

/// Well-known status condition types
pub mod conditions {
    pub const READY: &str = "Ready";
    pub const AVAILABLE: &str = "Available";
    pub const PROGRESSING: &str = "Progressing";
    pub const DEGRADED: &str = "Degraded";

    pub const STATUS_TRUE: &str = "True";
    pub const STATUS_FALSE: &str = "False";
}

/// Namespace used when neither the caller nor the environment picks one
pub const DEFAULT_NAMESPACE: &str = "default";

/// The field manager name used for server-side apply
pub const FIELD_MANAGER: &str = "agents-kruise-client";

/// Timeouts for watch-based operations
pub mod timeouts {
    /// Default deadline for wait-for-condition calls, in seconds
    pub const WAIT_SECS: u64 = 300;
    /// Default server-side watch timeout, in seconds
    pub const WATCH_SECS: u32 = 290;
    /// The API server rejects watch timeouts at or above this value
    pub const WATCH_LIMIT_SECS: u32 = 295;
}

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRDs
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}
