// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::types::common::{conditions_of, Condition, HasConditions, TemplateRef};
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "agents.kruise.io", version = "v1alpha1", kind = "Sandbox")]
#[kube(plural = "sandboxes", shortname = "sbx")]
#[kube(namespaced)]
#[kube(status = "SandboxStatus")]
#[kube(printcolumn = r#"{"name":"Phase","type":"string","jsonPath":".status.phase"}"#)]
#[serde(rename_all = "camelCase")]
pub struct SandboxSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_time: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutdown_time: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_ref: Option<TemplateRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PodTemplateSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_claim_templates: Option<Vec<PersistentVolumeClaim>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistent_contents: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SandboxStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_info: Option<PodInfo>,
}

/// The pod currently backing a sandbox
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PodInfo {
    #[serde(rename = "podIP", skip_serializing_if = "Option::is_none")]
    pub pod_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    #[serde(rename = "podUID", skip_serializing_if = "Option::is_none")]
    pub pod_uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

/// Lifecycle phase of a sandbox
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SandboxPhase {
    Pending,
    Running,
    Paused,
    Resuming,
    Succeeded,
    Failed,
    Terminating,
    Unknown,
}

impl From<&str> for SandboxPhase {
    fn from(s: &str) -> Self {
        match s {
            "Pending" => SandboxPhase::Pending,
            "Running" => SandboxPhase::Running,
            "Paused" => SandboxPhase::Paused,
            "Resuming" => SandboxPhase::Resuming,
            "Succeeded" => SandboxPhase::Succeeded,
            "Failed" => SandboxPhase::Failed,
            "Terminating" => SandboxPhase::Terminating,
            _ => SandboxPhase::Unknown,
        }
    }
}

impl Sandbox {
    /// Phase reported by the controller, Pending when no status exists yet
    pub fn phase(&self) -> SandboxPhase {
        self.status
            .as_ref()
            .and_then(|s| s.phase.as_deref())
            .map(SandboxPhase::from)
            .unwrap_or(SandboxPhase::Pending)
    }

    /// Whether the sandbox has been asked to pause
    pub fn is_paused(&self) -> bool {
        self.spec.paused.unwrap_or(false)
    }

    pub fn pod_ip(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|s| s.pod_info.as_ref())
            .and_then(|p| p.pod_ip.as_deref())
    }
}

impl HasConditions for Sandbox {
    fn conditions(&self) -> &[Condition] {
        conditions_of(self.status.as_ref(), |s| s.conditions.as_ref())
    }
}
