// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentsError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("{kind} '{name}' not found in namespace '{namespace}'")]
    NotFound {
        kind: String,
        name: String,
        namespace: String,
    },

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Wait failed: {0}")]
    Wait(#[from] kube::runtime::wait::Error),
}

impl From<serde_json::Error> for AgentsError {
    fn from(e: serde_json::Error) -> Self {
        AgentsError::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for AgentsError {
    fn from(e: serde_yaml::Error) -> Self {
        AgentsError::Serialization(e.to_string())
    }
}

impl AgentsError {
    /// Whether this error is a 404 from the API server or an explicit not-found
    pub fn is_not_found(&self) -> bool {
        match self {
            AgentsError::NotFound { .. } => true,
            AgentsError::KubeError(kube::Error::Api(err)) => {
                err.code == http::StatusCode::NOT_FOUND.as_u16()
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AgentsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16) -> AgentsError {
        AgentsError::KubeError(kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: "boom".to_string(),
            reason: "Whatever".to_string(),
            code,
        }))
    }

    #[test]
    fn test_not_found_display() {
        let err = AgentsError::NotFound {
            kind: "Sandbox".to_string(),
            name: "sbx-1".to_string(),
            namespace: "team-a".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Sandbox 'sbx-1' not found in namespace 'team-a'"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_is_not_found_for_api_404() {
        assert!(api_error(404).is_not_found());
        assert!(!api_error(500).is_not_found());
        assert!(!AgentsError::Timeout("x".to_string()).is_not_found());
    }
}
