// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::types::common::{conditions_of, Condition, HasConditions};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "agents.kruise.io", version = "v1alpha1", kind = "SandboxClaim")]
#[kube(plural = "sandboxclaims")]
#[kube(namespaced)]
#[kube(status = "SandboxClaimStatus")]
#[kube(printcolumn = r#"{"name":"Template","type":"string","jsonPath":".spec.templateName"}"#)]
#[kube(printcolumn = r#"{"name":"Phase","type":"string","jsonPath":".status.phase"}"#)]
#[serde(rename_all = "camelCase")]
pub struct SandboxClaimSpec {
    /// Name of the SandboxSet whose warm sandboxes are claimed
    pub template_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
    /// Duration string such as "30s" or "5m"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutdown_time: Option<Time>,
    /// Labels stamped onto every claimed sandbox
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_vars: Option<BTreeMap<String, String>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SandboxClaimStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_replicas: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_start_time: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SandboxClaimPhase {
    Claiming,
    Completed,
    Unknown,
}

impl From<&str> for SandboxClaimPhase {
    fn from(s: &str) -> Self {
        match s {
            "Claiming" => SandboxClaimPhase::Claiming,
            "Completed" => SandboxClaimPhase::Completed,
            _ => SandboxClaimPhase::Unknown,
        }
    }
}

impl SandboxClaim {
    /// Phase reported by the controller, Claiming until a status is written
    pub fn phase(&self) -> SandboxClaimPhase {
        self.status
            .as_ref()
            .and_then(|s| s.phase.as_deref())
            .map(SandboxClaimPhase::from)
            .unwrap_or(SandboxClaimPhase::Claiming)
    }

    pub fn is_completed(&self) -> bool {
        self.phase() == SandboxClaimPhase::Completed
    }

    /// Number of sandboxes asked for; a claim without replicas asks for one
    pub fn requested_replicas(&self) -> i32 {
        self.spec.replicas.unwrap_or(1)
    }

    pub fn claimed_replicas(&self) -> i32 {
        self.status
            .as_ref()
            .and_then(|s| s.claimed_replicas)
            .unwrap_or(0)
    }
}

impl HasConditions for SandboxClaim {
    fn conditions(&self) -> &[Condition] {
        conditions_of(self.status.as_ref(), |s| s.conditions.as_ref())
    }
}
