//! Boundary to the Konnect API.
//!
//! The reconciler only ever talks to [`KonnectSdk`]; [`KonnectClient`] is the
//! HTTP implementation, tests use the generated `MockKonnectSdk`.

mod client;
mod error;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

#[cfg(test)]
use mockall::automock;

pub use client::KonnectClient;
pub use error::SdkError;

#[cfg(test)]
pub(crate) use error::DATA_CONSTRAINT_BODY;

/// Where a collection of entities lives in the Konnect API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityPath {
    /// Organization wide, e.g. control planes.
    Global { collection: &'static str },
    ControlPlane {
        control_plane_id: String,
        collection: &'static str,
    },
    /// A collection owned by another entity, e.g. a consumer's credentials.
    Nested {
        control_plane_id: String,
        parent_collection: &'static str,
        parent_id: String,
        collection: &'static str,
    },
}

impl EntityPath {
    pub fn collection_path(&self) -> String {
        match self {
            EntityPath::Global { collection } => format!("/v2/{collection}"),
            EntityPath::ControlPlane {
                control_plane_id,
                collection,
            } => format!("/v2/control-planes/{control_plane_id}/core-entities/{collection}"),
            EntityPath::Nested {
                control_plane_id,
                parent_collection,
                parent_id,
                collection,
            } => format!(
                "/v2/control-planes/{control_plane_id}/core-entities/{parent_collection}/{parent_id}/{collection}"
            ),
        }
    }

    pub fn entity_path(&self, id: &str) -> String {
        format!("{}/{id}", self.collection_path())
    }

    pub fn control_plane_id(&self) -> Option<&str> {
        match self {
            EntityPath::Global { .. } => None,
            EntityPath::ControlPlane {
                control_plane_id, ..
            }
            | EntityPath::Nested {
                control_plane_id, ..
            } => Some(control_plane_id),
        }
    }
}

/// Server side filter for list calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFilter {
    Tags(String),
    Labels(String),
}

impl ListFilter {
    pub fn query(&self) -> (&'static str, &str) {
        match self {
            ListFilter::Tags(tag) => ("tags", tag),
            ListFilter::Labels(label) => ("labels", label),
        }
    }
}

/// The part of a remote entity the reconciler cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RemoteEntity {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RemoteEntity {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            tags: Vec::new(),
        }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait KonnectSdk: Send + Sync {
    async fn create(&self, path: &EntityPath, body: Value) -> Result<RemoteEntity, SdkError>;

    /// Update by ID.
    async fn upsert(
        &self,
        path: &EntityPath,
        id: &str,
        body: Value,
    ) -> Result<RemoteEntity, SdkError>;

    async fn delete(&self, path: &EntityPath, id: &str) -> Result<(), SdkError>;

    async fn list(
        &self,
        path: &EntityPath,
        filter: &ListFilter,
    ) -> Result<Vec<RemoteEntity>, SdkError>;

    fn server_url(&self) -> String;

    async fn organization_id(&self) -> Result<String, SdkError>;
}
