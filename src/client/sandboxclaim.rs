// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::client::resource::ResourceClient;
use crate::error::{AgentsError, Result};
use crate::types::{SandboxClaim, SandboxClaimSpec};
use std::time::Duration;

/// Client for SandboxClaim resources
pub type SandboxClaimClient = ResourceClient<SandboxClaim>;

impl ResourceClient<SandboxClaim> {
    /// Claim `replicas` warm sandboxes from the SandboxSet named `template_name`
    pub async fn claim(
        &self,
        name: &str,
        template_name: &str,
        replicas: i32,
        namespace: Option<&str>,
    ) -> Result<SandboxClaim> {
        if replicas < 1 {
            return Err(AgentsError::Validation(format!(
                "a claim needs at least one replica, got {}",
                replicas
            )));
        }

        let claim = SandboxClaim::new(
            name,
            SandboxClaimSpec {
                template_name: template_name.to_string(),
                replicas: Some(replicas),
                ..Default::default()
            },
        );
        self.create(&claim, namespace).await
    }

    /// Wait until the claim reports phase Completed
    pub async fn wait_for_completion(
        &self,
        name: &str,
        timeout: Duration,
        namespace: Option<&str>,
    ) -> Result<SandboxClaim> {
        self.wait_until(
            name,
            SandboxClaim::is_completed,
            "phase Completed",
            timeout,
            namespace,
        )
        .await
    }
}
