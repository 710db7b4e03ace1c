// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::client::resource::ResourceClient;
use crate::constants::conditions;
use crate::error::Result;
use crate::types::Sandbox;
use std::time::Duration;
use tracing::info;

/// Client for Sandbox resources
pub type SandboxClient = ResourceClient<Sandbox>;

impl ResourceClient<Sandbox> {
    /// Ask the controller to pause a sandbox
    pub async fn pause(&self, name: &str, namespace: Option<&str>) -> Result<Sandbox> {
        info!("Pausing sandbox {}", name);
        self.set_paused(name, true, namespace).await
    }

    /// Ask the controller to resume a paused sandbox
    pub async fn resume(&self, name: &str, namespace: Option<&str>) -> Result<Sandbox> {
        info!("Resuming sandbox {}", name);
        self.set_paused(name, false, namespace).await
    }

    async fn set_paused(
        &self,
        name: &str,
        paused: bool,
        namespace: Option<&str>,
    ) -> Result<Sandbox> {
        let body = serde_json::json!({ "spec": { "paused": paused } });
        self.update(name, &body, namespace).await
    }

    pub async fn wait_for_ready(
        &self,
        name: &str,
        timeout: Duration,
        namespace: Option<&str>,
    ) -> Result<Sandbox> {
        self.wait_for_condition(
            name,
            conditions::READY,
            conditions::STATUS_TRUE,
            timeout,
            namespace,
        )
        .await
    }
}
