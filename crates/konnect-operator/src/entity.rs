use std::fmt::Debug;

use kube::{core::NamespaceResourceScope, Resource, ResourceExt};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    crd::{EntityRef, HasKonnectStatus},
    error::{Op, OperatorError, OperatorResult},
    refs::ParentLink,
    sdk::{EntityPath, ListFilter},
    tags::uid_tag,
};

/// Per-kind capabilities the generic operations and reconciler need.
pub trait KonnectEntity:
    Resource<DynamicType = (), Scope = NamespaceResourceScope>
    + HasKonnectStatus
    + Clone
    + Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Remote request body.
    type Input: Serialize;

    /// `NoParent` or `Parent<P>`.
    type Parent: ParentLink<Self>;

    const KIND: &'static str;

    /// Collection segment in the Konnect API path.
    const COLLECTION: &'static str;

    /// False only for the control plane kind itself.
    const CONTROL_PLANE_SCOPED: bool = true;

    fn spec_tags(&self) -> &[String];

    fn control_plane_ref(&self) -> Option<&EntityRef>;

    fn to_input(&self, tags: Vec<String>) -> Self::Input;

    fn entity_path(&self, op: Op) -> OperatorResult<EntityPath> {
        control_plane_path(self, op)
    }

    fn list_filter(&self) -> ListFilter {
        ListFilter::Tags(uid_tag(self))
    }
}

/// `COLLECTION` directly under the object's control plane.
pub fn control_plane_path<K: KonnectEntity>(obj: &K, op: Op) -> OperatorResult<EntityPath> {
    let control_plane_id = obj.control_plane_id();
    if control_plane_id.is_empty() {
        return Err(OperatorError::MissingControlPlaneId {
            op,
            kind: K::KIND,
            key: object_key(obj),
        });
    }
    Ok(EntityPath::ControlPlane {
        control_plane_id: control_plane_id.to_string(),
        collection: K::COLLECTION,
    })
}

/// `namespace/name`, used in logs and error messages.
pub fn object_key<K: Resource>(obj: &K) -> String {
    format!("{}/{}", obj.namespace().unwrap_or_default(), obj.name_any())
}
