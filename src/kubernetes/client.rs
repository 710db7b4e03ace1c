// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes client bootstrap and kubeconfig utilities

use crate::error::{AgentsError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Create a Kubernetes client.
///
/// An explicit kubeconfig file always wins. Otherwise the in-cluster service
/// account is tried first and the local kubeconfig is used as a fallback. A
/// requested context skips the in-cluster attempt.
#[instrument(skip_all)]
pub async fn create_client(
    kubeconfig_path: Option<&Path>,
    context: Option<String>,
) -> Result<Client> {
    if let Some(path) = kubeconfig_path {
        debug!("Reading kubeconfig from {}", path.display());
        let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
            AgentsError::KubeconfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        return client_from_parsed(kubeconfig, context).await;
    }

    if context.is_none() {
        match KConfig::incluster() {
            Ok(config) => {
                info!("Loaded in-cluster Kubernetes configuration");
                return build_client(config);
            }
            Err(e) => debug!("In-cluster configuration unavailable: {}", e),
        }
    }

    let options = KubeConfigOptions {
        context,
        ..Default::default()
    };
    let config = KConfig::from_kubeconfig(&options)
        .await
        .map_err(|e| AgentsError::KubeconfigError(format!("Failed to load kubeconfig: {}", e)))?;
    info!("Loaded local Kubernetes configuration");
    build_client(config)
}

/// Create a Kubernetes client from a kubeconfig string
pub async fn create_client_from_kubeconfig(
    kubeconfig: &str,
    context: Option<String>,
) -> Result<Client> {
    let kubeconfig_parsed: Kubeconfig = serde_yaml::from_str(kubeconfig)
        .map_err(|e| AgentsError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e)))?;

    client_from_parsed(kubeconfig_parsed, context).await
}

async fn client_from_parsed(kubeconfig: Kubeconfig, context: Option<String>) -> Result<Client> {
    let options = KubeConfigOptions {
        context,
        ..Default::default()
    };
    let client_config = KConfig::from_custom_kubeconfig(kubeconfig, &options)
        .await
        .map_err(|e| AgentsError::KubeconfigError(format!("Failed to create config: {}", e)))?;

    build_client(client_config)
}

fn build_client(config: KConfig) -> Result<Client> {
    Client::try_from(config)
        .map_err(|e| AgentsError::KubeconfigError(format!("Failed to create client: {}", e)))
}
