// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::types::common::{conditions_of, Condition, HasConditions, TemplateRef};
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, PodTemplateSpec};
use kube::CustomResource;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "agents.kruise.io", version = "v1alpha1", kind = "SandboxSet")]
#[kube(plural = "sandboxsets", shortname = "sbs")]
#[kube(namespaced)]
#[kube(status = "SandboxSetStatus")]
#[kube(
    scale = r#"{"specReplicasPath":".spec.replicas","statusReplicasPath":".status.replicas","labelSelectorPath":".status.selector"}"#
)]
#[kube(printcolumn = r#"{"name":"Desired","type":"integer","jsonPath":".spec.replicas"}"#)]
#[kube(printcolumn = r#"{"name":"Available","type":"integer","jsonPath":".status.availableReplicas"}"#)]
#[serde(rename_all = "camelCase")]
pub struct SandboxSetSpec {
    #[serde(default)]
    pub replicas: i32,
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
pub struct SandboxSetStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_replicas: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_revision: Option<String>,
    /// Label selector in string form, consumed by the scale subresource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
}

impl SandboxSet {
    pub fn desired_replicas(&self) -> i32 {
        self.spec.replicas
    }

    pub fn available_replicas(&self) -> i32 {
        self.status
            .as_ref()
            .and_then(|s| s.available_replicas)
            .unwrap_or(0)
    }

    /// Check if the controller has caught up and every desired sandbox is available
    pub fn is_fully_available(&self) -> bool {
        let caught_up = match (self.metadata.generation, self.status.as_ref()) {
            (Some(generation), Some(status)) => status
                .observed_generation
                .is_some_and(|observed| observed >= generation),
            (None, Some(_)) => true,
            (_, None) => false,
        };
        caught_up && self.available_replicas() >= self.desired_replicas()
    }
}

impl HasConditions for SandboxSet {
    fn conditions(&self) -> &[Condition] {
        conditions_of(self.status.as_ref(), |s| s.conditions.as_ref())
    }
}
