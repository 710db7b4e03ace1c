// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::client::resource::ResourceClient;
use crate::error::{AgentsError, Result};
use crate::types::SandboxSet;
use tracing::{info, instrument};

/// Client for SandboxSet resources
pub type SandboxSetClient = ResourceClient<SandboxSet>;

impl ResourceClient<SandboxSet> {
    /// Scale a SandboxSet to the specified number of replicas
    #[instrument(skip(self))]
    pub async fn scale(
        &self,
        name: &str,
        replicas: i32,
        namespace: Option<&str>,
    ) -> Result<SandboxSet> {
        if replicas < 0 {
            return Err(AgentsError::Validation(format!(
                "replicas must not be negative, got {}",
                replicas
            )));
        }

        info!("Scaling sandboxset {} to {} replicas", name, replicas);
        let body = serde_json::json!({ "spec": { "replicas": replicas } });
        self.update(name, &body, namespace).await
    }

    /// Desired number of replicas from the spec
    pub async fn get_replicas(&self, name: &str, namespace: Option<&str>) -> Result<i32> {
        Ok(self.get(name, namespace).await?.desired_replicas())
    }
}
