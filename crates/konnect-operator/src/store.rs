//! Kubernetes object store boundary.

use std::fmt::Debug;

use async_trait::async_trait;
use kube::{
    api::{Patch, PatchParams},
    core::NamespaceResourceScope,
    Api, Client, Resource, ResourceExt,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;

use crate::{entity::KonnectEntity, error::OperatorResult};

/// Any namespaced object the store can read, managed or not.
pub trait NamespacedObject:
    Resource<DynamicType = (), Scope = NamespaceResourceScope>
    + Clone
    + Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
}

impl<T> NamespacedObject for T where
    T: Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + Clone
        + Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static
{
}

/// Reads and writes of managed objects. Writes are merge patches carrying
/// `metadata.resourceVersion`, so a stale copy fails with a 409.
#[async_trait]
pub trait KubeStore: Send + Sync + 'static {
    async fn get<K: NamespacedObject>(&self, namespace: &str, name: &str) -> OperatorResult<Option<K>>;

    async fn patch_status<K: KonnectEntity>(&self, obj: &K) -> OperatorResult<K>;

    /// Writes finalizers and owner references. `None` once the object is gone.
    async fn patch_metadata<K: KonnectEntity>(&self, obj: &K) -> OperatorResult<Option<K>>;
}

#[derive(Clone)]
pub struct KubeApiStore {
    client: Client,
}

impl KubeApiStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api<K: NamespacedObject>(&self, namespace: &str) -> Api<K> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl KubeStore for KubeApiStore {
    async fn get<K: NamespacedObject>(&self, namespace: &str, name: &str) -> OperatorResult<Option<K>> {
        Ok(self.api::<K>(namespace).get_opt(name).await?)
    }

    async fn patch_status<K: KonnectEntity>(&self, obj: &K) -> OperatorResult<K> {
        let patch = json!({
            "metadata": { "resourceVersion": obj.resource_version() },
            "status": obj.konnect_status(),
        });
        let api = self.api::<K>(&obj.namespace().unwrap_or_default());
        Ok(api
            .patch_status(&obj.name_any(), &PatchParams::default(), &Patch::Merge(&patch))
            .await?)
    }

    async fn patch_metadata<K: KonnectEntity>(&self, obj: &K) -> OperatorResult<Option<K>> {
        let patch = json!({
            "metadata": {
                "resourceVersion": obj.resource_version(),
                "finalizers": obj.finalizers(),
                "ownerReferences": obj.owner_references(),
            }
        });
        let api = self.api::<K>(&obj.namespace().unwrap_or_default());
        match api
            .patch(&obj.name_any(), &PatchParams::default(), &Patch::Merge(&patch))
            .await
        {
            Ok(updated) => {
                let gone =
                    updated.meta().deletion_timestamp.is_some() && updated.finalizers().is_empty();
                Ok((!gone).then_some(updated))
            }
            Err(kube::Error::Api(resp)) if resp.code == 404 => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
