// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Types shared by every agents resource.

use crate::constants::conditions;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use serde::{Deserialize, Serialize};

/// A status condition as reported by the agents controllers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

impl Condition {
    pub fn new(condition_type: &str, status: &str) -> Self {
        Self {
            condition_type: condition_type.to_string(),
            status: status.to_string(),
            reason: None,
            message: None,
            last_transition_time: None,
            observed_generation: None,
        }
    }
}

/// Reference to a named sandbox template
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRef {
    pub name: String,
}

/// Access to the status conditions of a resource
pub trait HasConditions {
    /// All conditions, empty when the resource has no status yet
    fn conditions(&self) -> &[Condition];

    fn condition(&self, condition_type: &str) -> Option<&Condition> {
        self.conditions()
            .iter()
            .find(|c| c.condition_type == condition_type)
    }

    fn has_condition(&self, condition_type: &str, status: &str) -> bool {
        self.condition(condition_type)
            .is_some_and(|c| c.status == status)
    }

    /// Check if the resource reports Ready=True
    fn is_ready(&self) -> bool {
        self.has_condition(conditions::READY, conditions::STATUS_TRUE)
    }
}

/// Borrow the conditions out of an optional status
pub(crate) fn conditions_of<'a, S>(
    status: Option<&'a S>,
    get: impl Fn(&'a S) -> Option<&'a Vec<Condition>>,
) -> &'a [Condition] {
    status.and_then(get).map(Vec::as_slice).unwrap_or(&[])
}
