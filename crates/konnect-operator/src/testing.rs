//! Test helpers: object builders and an in-memory [`KubeStore`].

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};
use kube::{core::ErrorResponse, Resource, ResourceExt};
use serde_json::Value;

use crate::{
    conditions,
    crd::HasKonnectStatus,
    entity::KonnectEntity,
    error::{OperatorError, OperatorResult},
    store::{KubeStore, NamespacedObject},
};

pub fn meta(name: &str, namespace: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        uid: Some(format!("uid-{name}")),
        generation: Some(1),
        ..Default::default()
    }
}

pub fn with_konnect<K: HasKonnectStatus>(mut obj: K, id: &str, control_plane_id: &str) -> K {
    let status = &mut obj.konnect_status_mut().konnect;
    status.id = id.to_string();
    status.control_plane_id = control_plane_id.to_string();
    obj
}

/// Marks `obj` as programmed at its current generation.
pub fn programmed<K: KonnectEntity>(mut obj: K, id: &str, control_plane_id: &str) -> K {
    conditions::set_programmed(&mut obj);
    with_konnect(obj, id, control_plane_id)
}

pub fn deleting<K: Resource>(mut obj: K) -> K {
    obj.meta_mut().deletion_timestamp = Some(Time(chrono::Utc::now()));
    obj
}

fn api_error(code: u16, reason: &str, message: String) -> OperatorError {
    OperatorError::Kube {
        source: kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message,
            reason: reason.to_string(),
            code,
        }),
    }
}

type Key = (String, String, String);

/// In-memory API server: resourceVersion checks on every write and
/// finalizer-gated removal of deleting objects.
#[derive(Default)]
pub struct FakeStore {
    objects: Mutex<HashMap<Key, Value>>,
    version: AtomicU64,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key<K: NamespacedObject>(namespace: &str, name: &str) -> Key {
        (K::kind(&()).into_owned(), namespace.to_string(), name.to_string())
    }

    fn next_version(&self) -> String {
        (self.version.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }

    /// Stores `obj` as a fresh revision and returns it as stored.
    pub fn insert<K: NamespacedObject>(&self, mut obj: K) -> K {
        obj.meta_mut().resource_version = Some(self.next_version());
        let key = Self::key::<K>(&obj.namespace().unwrap_or_default(), &obj.name_any());
        let value = serde_json::to_value(&obj).unwrap();
        self.objects.lock().unwrap().insert(key, value);
        obj
    }

    pub fn fetch<K: NamespacedObject>(&self, namespace: &str, name: &str) -> Option<K> {
        self.objects
            .lock()
            .unwrap()
            .get(&Self::key::<K>(namespace, name))
            .map(|v| serde_json::from_value(v.clone()).unwrap())
    }

    /// Stored copy of `obj` if `obj` is at its resourceVersion.
    fn current<K: KonnectEntity>(&self, obj: &K) -> OperatorResult<K> {
        let namespace = obj.namespace().unwrap_or_default();
        let name = obj.name_any();
        let stored: K = self.fetch(&namespace, &name).ok_or_else(|| {
            api_error(404, "NotFound", format!("{} {namespace}/{name} not found", K::KIND))
        })?;
        if stored.resource_version() != obj.resource_version() {
            return Err(api_error(
                409,
                "Conflict",
                "the object has been modified; please apply your changes to the latest version"
                    .to_string(),
            ));
        }
        Ok(stored)
    }
}

#[async_trait]
impl KubeStore for FakeStore {
    async fn get<K: NamespacedObject>(&self, namespace: &str, name: &str) -> OperatorResult<Option<K>> {
        Ok(self.fetch(namespace, name))
    }

    async fn patch_status<K: KonnectEntity>(&self, obj: &K) -> OperatorResult<K> {
        let mut stored = self.current(obj)?;
        if let Some(status) = obj.konnect_status() {
            *stored.konnect_status_mut() = status.clone();
        }
        Ok(self.insert(stored))
    }

    async fn patch_metadata<K: KonnectEntity>(&self, obj: &K) -> OperatorResult<Option<K>> {
        let mut stored = self.current(obj)?;
        stored.meta_mut().finalizers = obj.meta().finalizers.clone();
        stored.meta_mut().owner_references = obj.meta().owner_references.clone();

        if stored.meta().deletion_timestamp.is_some() && stored.finalizers().is_empty() {
            let key = Self::key::<K>(&stored.namespace().unwrap_or_default(), &stored.name_any());
            self.objects.lock().unwrap().remove(&key);
            return Ok(None);
        }
        Ok(Some(self.insert(stored)))
    }
}
