// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{timeouts, DEFAULT_NAMESPACE};
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Client configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Namespace used when an operation does not name one
    pub namespace: String,
    /// Deadline for wait-for-condition operations
    pub wait_timeout: Duration,
    /// Kubeconfig context to use instead of the current one
    pub context: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            namespace: DEFAULT_NAMESPACE.to_string(),
            wait_timeout: Duration::from_secs(timeouts::WAIT_SECS),
            context: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let namespace = lookup("AGENTS_NAMESPACE")
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        let wait_timeout = match lookup("AGENTS_WAIT_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse()
                    .with_context(|| format!("AGENTS_WAIT_TIMEOUT_SECS is not a number: {raw}"))?,
            ),
            None => Duration::from_secs(timeouts::WAIT_SECS),
        };

        let context = lookup("KUBECONFIG_CONTEXT").filter(|c| !c.is_empty());

        Ok(Config {
            namespace,
            wait_timeout,
            context,
        })
    }
}
