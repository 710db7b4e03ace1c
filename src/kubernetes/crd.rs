// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CRD generation, installation and availability checking utilities

use crate::constants::crd::{POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::constants::{kinds, API_GROUP, API_VERSION, FIELD_MANAGER, GROUP_VERSION};
use crate::error::{AgentsError, Result};
use crate::types::{Sandbox, SandboxClaim, SandboxSet};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::{
    api::{Patch, PatchParams},
    discovery::Discovery,
    Api, Client, CustomResourceExt, ResourceExt,
};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

/// CRDs for every agents resource kind
pub fn all_crds() -> Vec<CustomResourceDefinition> {
    vec![Sandbox::crd(), SandboxSet::crd(), SandboxClaim::crd()]
}

/// Render all CRDs as a multi-document YAML stream
pub fn crds_yaml() -> Result<String> {
    let docs = all_crds()
        .iter()
        .map(serde_yaml::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(docs.join("---\n"))
}

/// Extract `.spec.versions[0].schema.openAPIV3Schema` from CRD YAML.
///
/// Multi-document input is accepted; the first document carrying a schema wins.
pub fn extract_schema(crd_yaml: &str) -> Result<serde_json::Value> {
    for document in serde_yaml::Deserializer::from_str(crd_yaml) {
        let doc = serde_json::Value::deserialize(document)?;
        if let Some(schema) = doc.pointer(SCHEMA_POINTER) {
            return Ok(schema.clone());
        }
    }

    Err(AgentsError::Validation(
        "no document has .spec.versions[0].schema.openAPIV3Schema".to_string(),
    ))
}

const SCHEMA_POINTER: &str = "/spec/versions/0/schema/openAPIV3Schema";

/// Install or update every CRD with server-side apply
#[instrument(skip(client))]
pub async fn apply_crds(client: &Client) -> Result<()> {
    let crds: Api<CustomResourceDefinition> = Api::all(client.clone());
    let pp = PatchParams::apply(FIELD_MANAGER).force();

    for crd in all_crds() {
        let name = crd.name_any();
        info!("Applying CRD {}", name);
        crds.patch(&name, &pp, &Patch::Apply(&crd)).await?;
    }

    Ok(())
}

/// Wait for every agents CRD to become available in the cluster.
/// This uses exponential backoff starting at POLL_INTERVAL_SECS seconds.
pub async fn wait_for_crds(client: &Client) -> Result<()> {
    let mut interval = POLL_INTERVAL_SECS;

    loop {
        match missing_kinds(client).await {
            Ok(missing) if missing.is_empty() => {
                info!("Agents CRDs ({}) are available", GROUP_VERSION);
                return Ok(());
            }
            Ok(missing) => {
                info!(
                    "Agents CRDs not yet available (missing: {}), waiting {} seconds...",
                    missing.join(", "),
                    interval
                );
            }
            Err(e) => {
                warn!(
                    "Error checking for agents CRDs: {}, retrying in {} seconds...",
                    e, interval
                );
            }
        }

        sleep(Duration::from_secs(interval)).await;

        interval = (interval * 2).min(POLL_MAX_INTERVAL_SECS);
    }
}

/// Kinds that API discovery does not (yet) serve under the agents group/version
async fn missing_kinds(client: &Client) -> Result<Vec<&'static str>> {
    let discovery = Discovery::new(client.clone())
        .filter(&[API_GROUP])
        .run()
        .await?;

    let mut served = Vec::new();
    for group in discovery.groups() {
        if group.name() == API_GROUP {
            for (ar, _) in group.versioned_resources(API_VERSION) {
                served.push(ar.kind);
            }
        }
    }

    Ok(kinds::ALL
        .into_iter()
        .filter(|kind| !served.iter().any(|s| s.as_str() == *kind))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockService;

    const CRD_PATH: &str = "/apis/apiextensions.k8s.io/v1/customresourcedefinitions";

    fn discovery_mock(served: &[(&str, &str)]) -> MockService {
        let groups = serde_json::json!({
            "kind": "APIGroupList",
            "apiVersion": "v1",
            "groups": [{
                "name": API_GROUP,
                "versions": [{"groupVersion": GROUP_VERSION, "version": API_VERSION}],
                "preferredVersion": {"groupVersion": GROUP_VERSION, "version": API_VERSION}
            }]
        });
        let resources: Vec<serde_json::Value> = served
            .iter()
            .map(|(plural, kind)| {
                serde_json::json!({
                    "name": plural,
                    "singularName": kind.to_lowercase(),
                    "namespaced": true,
                    "kind": kind,
                    "verbs": ["get", "list", "watch", "create", "patch", "delete"]
                })
            })
            .collect();
        let resource_list = serde_json::json!({
            "kind": "APIResourceList",
            "apiVersion": "v1",
            "groupVersion": GROUP_VERSION,
            "resources": resources
        });

        MockService::new()
            .on_get("/apis", 200, &groups.to_string())
            .on_get(
                &format!("/apis/{}", GROUP_VERSION),
                200,
                &resource_list.to_string(),
            )
    }

    #[test]
    fn test_all_crds_names() {
        let names: Vec<String> = all_crds().iter().map(|c| c.name_any()).collect();
        assert_eq!(
            names,
            vec![
                "sandboxes.agents.kruise.io",
                "sandboxsets.agents.kruise.io",
                "sandboxclaims.agents.kruise.io",
            ]
        );
    }

    #[test]
    fn test_crds_are_namespaced_with_status() {
        for crd in all_crds() {
            assert_eq!(crd.spec.group, API_GROUP);
            assert_eq!(crd.spec.scope, "Namespaced");
            let version = &crd.spec.versions[0];
            assert_eq!(version.name, API_VERSION);
            assert!(version
                .subresources
                .as_ref()
                .and_then(|s| s.status.as_ref())
                .is_some());
        }
    }

    #[test]
    fn test_sandboxset_crd_has_scale_subresource() {
        let crd = SandboxSet::crd();
        let scale = crd.spec.versions[0]
            .subresources
            .as_ref()
            .and_then(|s| s.scale.as_ref())
            .unwrap();
        assert_eq!(scale.spec_replicas_path, ".spec.replicas");
        assert_eq!(scale.status_replicas_path, ".status.replicas");
    }

    #[test]
    fn test_crds_yaml_is_multi_document() {
        let yaml = crds_yaml().unwrap();
        assert_eq!(yaml.matches("---\n").count(), 2);
        assert!(yaml.contains("kind: CustomResourceDefinition"));
    }

    #[test]
    fn test_extract_schema_from_generated_crd() {
        let yaml = serde_yaml::to_string(&Sandbox::crd()).unwrap();
        let schema = extract_schema(&yaml).unwrap();

        let spec = &schema["properties"]["spec"]["properties"];
        assert!(spec.get("template").is_some());
        assert!(spec.get("volumeClaimTemplates").is_some());
        assert!(schema["properties"]["status"]["properties"]
            .get("podInfo")
            .is_some());
    }

    #[test]
    fn test_extract_schema_missing_path() {
        let err = extract_schema("apiVersion: v1\nkind: ConfigMap\n").unwrap_err();
        assert!(matches!(err, AgentsError::Validation(_)));
    }

    #[test]
    fn test_extract_schema_invalid_yaml() {
        let err = extract_schema("spec: [").unwrap_err();
        assert!(matches!(err, AgentsError::Serialization(_)));
    }

    #[test]
    fn test_extract_schema_from_multi_document_output() {
        let yaml = format!("apiVersion: v1\nkind: ConfigMap\n---\n{}", crds_yaml().unwrap());
        let schema = extract_schema(&yaml).unwrap();
        assert!(schema["properties"]["spec"]["properties"]
            .get("templateRef")
            .is_some());
    }

    #[tokio::test]
    async fn test_apply_crds_forces_server_side_apply() {
        let crd = serde_json::to_string(&Sandbox::crd()).unwrap();
        let mock = MockService::new().on_patch(CRD_PATH, 200, &crd);
        let requests = mock.recorder();

        apply_crds(&mock.into_client()).await.unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        let first = &requests[0];
        assert_eq!(first.method, "PATCH");
        assert_eq!(first.path, format!("{}/sandboxes.agents.kruise.io", CRD_PATH));
        assert!(first.query.contains("fieldManager=agents-kruise-client"));
        assert!(first.query.contains("force=true"));
        assert_eq!(
            first.content_type.as_deref(),
            Some("application/apply-patch+yaml")
        );
        assert_eq!(first.json()["apiVersion"], "apiextensions.k8s.io/v1");
        assert_eq!(
            requests[2].path,
            format!("{}/sandboxclaims.agents.kruise.io", CRD_PATH)
        );
    }

    #[tokio::test]
    async fn test_missing_kinds_reports_unserved() {
        let client = discovery_mock(&[("sandboxes", kinds::SANDBOX)]).into_client();
        let missing = missing_kinds(&client).await.unwrap();
        assert_eq!(missing, vec![kinds::SANDBOX_SET, kinds::SANDBOX_CLAIM]);
    }

    #[tokio::test]
    async fn test_wait_for_crds_returns_when_all_served() {
        let client = discovery_mock(&[
            (kinds::SANDBOX_PLURAL, kinds::SANDBOX),
            (kinds::SANDBOX_SET_PLURAL, kinds::SANDBOX_SET),
            (kinds::SANDBOX_CLAIM_PLURAL, kinds::SANDBOX_CLAIM),
        ])
        .into_client();

        tokio::time::timeout(Duration::from_secs(5), wait_for_crds(&client))
            .await
            .unwrap()
            .unwrap();
    }
}
