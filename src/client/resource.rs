// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Generic namespaced client that forwards CRUD, watch and wait operations to `kube::Api`.

use crate::config::Config;
use crate::constants::timeouts::{WATCH_LIMIT_SECS, WATCH_SECS};
use crate::constants::FIELD_MANAGER;
use crate::error::{AgentsError, Result};
use crate::types::HasConditions;
use futures::future;
use futures::stream::{BoxStream, StreamExt};
use k8s_openapi::NamespaceResourceScope;
use kube::{
    api::{DeleteParams, ListParams, Patch, PatchParams, PostParams, WatchEvent, WatchParams},
    Api, Client, Resource, ResourceExt,
};
use kube_runtime::wait::await_condition;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Bounds shared by every agents resource handled by [`ResourceClient`]
pub trait AgentsResource:
    Clone
    + Resource<Scope = NamespaceResourceScope, DynamicType = ()>
    + HasConditions
    + DeserializeOwned
    + Serialize
    + Debug
    + Send
    + Sync
    + 'static
{
}

impl<T> AgentsResource for T where
    T: Clone
        + Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + HasConditions
        + DeserializeOwned
        + Serialize
        + Debug
        + Send
        + Sync
        + 'static
{
}

/// Client for one agents resource kind, bound to a default namespace.
///
/// Every operation takes an optional namespace that overrides the default.
#[derive(Clone)]
pub struct ResourceClient<K> {
    client: Client,
    namespace: String,
    _kind: PhantomData<K>,
}

impl<K: AgentsResource> ResourceClient<K> {
    pub fn new(client: Client, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        debug!("Initializing {} client with namespace: {}", K::kind(&()), namespace);
        Self {
            client,
            namespace,
            _kind: PhantomData,
        }
    }

    pub fn from_config(client: Client, config: &Config) -> Self {
        Self::new(client, config.namespace.clone())
    }

    /// The namespace used when an operation does not name one
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn resolve<'a>(&'a self, namespace: Option<&'a str>) -> &'a str {
        namespace.unwrap_or(&self.namespace)
    }

    /// Typed `kube::Api` for the resolved namespace
    pub fn api(&self, namespace: Option<&str>) -> Api<K> {
        Api::namespaced(self.client.clone(), self.resolve(namespace))
    }

    #[instrument(skip(self, obj), fields(kind = %K::kind(&()), name = %obj.name_any()))]
    pub async fn create(&self, obj: &K, namespace: Option<&str>) -> Result<K> {
        let ns = self.resolve(namespace);
        let created = self
            .api(namespace)
            .create(&PostParams::default(), obj)
            .await
            .map_err(|e| classify::<K>(e, &obj.name_any(), ns))?;
        info!("Created {} {}/{}", K::kind(&()), ns, created.name_any());
        Ok(created)
    }

    /// Get a resource by name, mapping 404 to [`AgentsError::NotFound`]
    #[instrument(skip(self), fields(kind = %K::kind(&())))]
    pub async fn get(&self, name: &str, namespace: Option<&str>) -> Result<K> {
        self.api(namespace)
            .get(name)
            .await
            .map_err(|e| classify::<K>(e, name, self.resolve(namespace)))
    }

    /// Update a resource with a JSON merge patch of the given body
    pub async fn update(
        &self,
        name: &str,
        body: &serde_json::Value,
        namespace: Option<&str>,
    ) -> Result<K> {
        self.patch(name, &Patch::Merge(body), namespace).await
    }

    /// Replace the whole resource; the object must carry a current resourceVersion
    #[instrument(skip(self, obj), fields(kind = %K::kind(&())))]
    pub async fn replace(&self, name: &str, obj: &K, namespace: Option<&str>) -> Result<K> {
        self.api(namespace)
            .replace(name, &PostParams::default(), obj)
            .await
            .map_err(|e| classify::<K>(e, name, self.resolve(namespace)))
    }

    /// Merge-patch the status subresource
    #[instrument(skip(self, body), fields(kind = %K::kind(&())))]
    pub async fn update_status(
        &self,
        name: &str,
        body: &serde_json::Value,
        namespace: Option<&str>,
    ) -> Result<K> {
        self.api(namespace)
            .patch_status(name, &PatchParams::default(), &Patch::Merge(body))
            .await
            .map_err(|e| classify::<K>(e, name, self.resolve(namespace)))
    }

    /// Apply any kind of patch; apply patches use this crate's field manager
    #[instrument(skip(self, patch), fields(kind = %K::kind(&())))]
    pub async fn patch<P: Serialize + Debug>(
        &self,
        name: &str,
        patch: &Patch<P>,
        namespace: Option<&str>,
    ) -> Result<K> {
        let pp = match patch {
            Patch::Apply(_) => PatchParams::apply(FIELD_MANAGER),
            _ => PatchParams::default(),
        };
        self.api(namespace)
            .patch(name, &pp, patch)
            .await
            .map_err(|e| classify::<K>(e, name, self.resolve(namespace)))
    }

    #[instrument(skip(self), fields(kind = %K::kind(&())))]
    pub async fn delete(
        &self,
        name: &str,
        grace_period_seconds: Option<u32>,
        namespace: Option<&str>,
    ) -> Result<()> {
        let ns = self.resolve(namespace);
        let dp = DeleteParams {
            grace_period_seconds,
            ..Default::default()
        };

        self.api(namespace)
            .delete(name, &dp)
            .await
            .map_err(|e| classify::<K>(e, name, ns))?
            .either(
                |_| info!("Deletion of {} {}/{} started", K::kind(&()), ns, name),
                |_| info!("Deleted {} {}/{}", K::kind(&()), ns, name),
            );
        Ok(())
    }

    /// Delete every matching resource, returning how many deletions were started
    #[instrument(skip(self), fields(kind = %K::kind(&())))]
    pub async fn delete_collection(
        &self,
        label_selector: Option<&str>,
        field_selector: Option<&str>,
        namespace: Option<&str>,
    ) -> Result<usize> {
        let lp = list_params(label_selector, field_selector);
        let deleted = self
            .api(namespace)
            .delete_collection(&DeleteParams::default(), &lp)
            .await
            .map_err(|e| classify::<K>(e, "", self.resolve(namespace)))?
            .either(|list| list.items.len(), |_| 0);
        info!("Deleting {} {} resources", deleted, K::kind(&()));
        Ok(deleted)
    }

    #[instrument(skip(self), fields(kind = %K::kind(&())))]
    pub async fn list(
        &self,
        label_selector: Option<&str>,
        field_selector: Option<&str>,
        namespace: Option<&str>,
    ) -> Result<Vec<K>> {
        let lp = list_params(label_selector, field_selector);
        let list = self
            .api(namespace)
            .list(&lp)
            .await
            .map_err(|e| classify::<K>(e, "", self.resolve(namespace)))?;
        Ok(list.items)
    }

    /// Watch resources from the most recent state onwards.
    ///
    /// The resource version is left unset, so the server starts from a fresh
    /// read and replays existing objects as `ADDED` events. The stream ends
    /// after the first `ERROR` event or transport error. The server-side
    /// timeout defaults to 290 seconds and must stay below 295 seconds.
    #[instrument(skip(self), fields(kind = %K::kind(&())))]
    pub async fn watch(
        &self,
        label_selector: Option<&str>,
        field_selector: Option<&str>,
        timeout_seconds: Option<u32>,
        namespace: Option<&str>,
    ) -> Result<BoxStream<'static, Result<WatchEvent<K>>>> {
        let mut wp = WatchParams::default();
        if let Some(labels) = label_selector {
            wp = wp.labels(labels);
        }
        if let Some(fields) = field_selector {
            wp = wp.fields(fields);
        }
        let timeout = timeout_seconds.unwrap_or(WATCH_SECS);
        if timeout >= WATCH_LIMIT_SECS {
            return Err(AgentsError::Validation(format!(
                "watch timeout must be below {} seconds, got {}",
                WATCH_LIMIT_SECS, timeout
            )));
        }
        wp = wp.timeout(timeout);

        let events = self
            .api(namespace)
            .watch(&wp, "")
            .await
            .map_err(|e| classify::<K>(e, "", self.resolve(namespace)))?;

        Ok(events
            .map(|event| event.map_err(AgentsError::from))
            .scan(false, |stopped, event| {
                if *stopped {
                    return future::ready(None);
                }
                *stopped = matches!(event, Ok(WatchEvent::Error(_)) | Err(_));
                future::ready(Some(event))
            })
            .boxed())
    }

    /// Wait until the named resource reports the given condition status
    pub async fn wait_for_condition(
        &self,
        name: &str,
        condition_type: &str,
        condition_status: &str,
        timeout: Duration,
        namespace: Option<&str>,
    ) -> Result<K> {
        let description = format!("condition {}={}", condition_type, condition_status);
        self.wait_until(
            name,
            |obj: &K| obj.has_condition(condition_type, condition_status),
            &description,
            timeout,
            namespace,
        )
        .await
    }

    /// Wait until `matches` holds for the named resource.
    ///
    /// Fails with `Timeout` when the deadline passes and with `NotFound` when the
    /// resource is deleted while waiting.
    #[instrument(skip(self, matches), fields(kind = %K::kind(&())))]
    pub async fn wait_until(
        &self,
        name: &str,
        matches: impl Fn(&K) -> bool,
        description: &str,
        timeout: Duration,
        namespace: Option<&str>,
    ) -> Result<K> {
        let ns = self.resolve(namespace);
        info!(
            "Waiting up to {:?} for {} {}/{} to reach {}",
            timeout,
            K::kind(&()),
            ns,
            name,
            description
        );

        let waiting = await_condition(self.api(namespace), name, until_gone_or(matches));
        match tokio::time::timeout(timeout, waiting).await {
            Ok(Ok(Some(obj))) => Ok(obj),
            Ok(Ok(None)) => Err(not_found::<K>(name, ns)),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(AgentsError::Timeout(format!(
                "waiting for {} of {} {} in namespace {}",
                description,
                K::kind(&()),
                name,
                ns
            ))),
        }
    }
}

/// Wrap a predicate so that a resource vanishing after it was seen also ends the wait
fn until_gone_or<K>(matches: impl Fn(&K) -> bool) -> impl Fn(Option<&K>) -> bool {
    let seen = AtomicBool::new(false);
    move |obj: Option<&K>| match obj {
        Some(obj) => {
            seen.store(true, Ordering::Relaxed);
            matches(obj)
        }
        None => seen.load(Ordering::Relaxed),
    }
}

fn list_params(label_selector: Option<&str>, field_selector: Option<&str>) -> ListParams {
    let mut lp = ListParams::default();
    if let Some(labels) = label_selector {
        lp = lp.labels(labels);
    }
    if let Some(fields) = field_selector {
        lp = lp.fields(fields);
    }
    lp
}

fn not_found<K: Resource<DynamicType = ()>>(name: &str, namespace: &str) -> AgentsError {
    AgentsError::NotFound {
        kind: K::kind(&()).to_string(),
        name: name.to_string(),
        namespace: namespace.to_string(),
    }
}

/// Map API status codes that callers handle specifically
fn classify<K: Resource<DynamicType = ()>>(
    err: kube::Error,
    name: &str,
    namespace: &str,
) -> AgentsError {
    match err {
        kube::Error::Api(resp)
            if resp.code == http::StatusCode::NOT_FOUND.as_u16() && !name.is_empty() =>
        {
            not_found::<K>(name, namespace)
        }
        kube::Error::Api(resp) if resp.code == http::StatusCode::FORBIDDEN.as_u16() => {
            AgentsError::PermissionDenied(resp.message)
        }
        other => other.into(),
    }
}
