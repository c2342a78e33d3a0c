use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    crd::{EntityRef, KonnectGatewayControlPlane},
    entity::KonnectEntity,
    error::{Op, OperatorResult},
    refs::NoParent,
    sdk::{EntityPath, ListFilter},
    tags::{identity_labels, uid_tag},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlPlaneInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_type: Option<String>,
    pub labels: BTreeMap<String, String>,
}

impl KonnectEntity for KonnectGatewayControlPlane {
    type Input = ControlPlaneInput;
    type Parent = NoParent;

    const KIND: &'static str = "KonnectGatewayControlPlane";
    const COLLECTION: &'static str = "control-planes";
    const CONTROL_PLANE_SCOPED: bool = false;

    fn spec_tags(&self) -> &[String] {
        &[]
    }

    fn control_plane_ref(&self) -> Option<&EntityRef> {
        None
    }

    // Control planes carry labels, not tags.
    fn to_input(&self, _tags: Vec<String>) -> ControlPlaneInput {
        let mut labels = self.spec.labels.clone();
        labels.extend(identity_labels(self));
        ControlPlaneInput {
            name: self.spec.name.clone(),
            description: self.spec.description.clone(),
            cluster_type: self.spec.cluster_type.clone(),
            labels,
        }
    }

    fn entity_path(&self, _op: Op) -> OperatorResult<EntityPath> {
        Ok(EntityPath::Global {
            collection: Self::COLLECTION,
        })
    }

    fn list_filter(&self) -> ListFilter {
        ListFilter::Labels(uid_tag(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        crd::KonnectGatewayControlPlaneSpec,
        sdk::{MockKonnectSdk, RemoteEntity},
        testing::meta,
    };

    fn control_plane() -> KonnectGatewayControlPlane {
        let mut cp = KonnectGatewayControlPlane::new(
            "cp-1",
            KonnectGatewayControlPlaneSpec {
                name: "cp-1".to_string(),
                labels: BTreeMap::from([("team".to_string(), "edge".to_string())]),
                ..Default::default()
            },
        );
        cp.metadata = meta("cp-1", "ns");
        cp
    }

    #[test]
    fn test_labels_merge_identity() {
        let cp = control_plane();

        let input = cp.to_input(Vec::new());

        assert_eq!(input.labels.get("team").map(String::as_str), Some("edge"));
        assert_eq!(input.labels.get("k8s-uid").map(String::as_str), Some("uid-cp-1"));
        assert_eq!(
            input.labels.get("k8s-kind").map(String::as_str),
            Some("KonnectGatewayControlPlane")
        );
    }

    #[tokio::test]
    async fn test_control_plane_is_global_and_found_by_label() {
        let mut cp = control_plane();
        let mut sdk = MockKonnectSdk::new();
        sdk.expect_create()
            .withf(|path, _| {
                *path
                    == EntityPath::Global {
                        collection: "control-planes",
                    }
            })
            .returning(|_, _| Ok(RemoteEntity::with_id("cp-id")));
        sdk.expect_list()
            .withf(|_, filter| *filter == ListFilter::Labels("k8s-uid:uid-cp-1".to_string()))
            .returning(|_, _| Ok(vec![RemoteEntity::with_id("cp-id")]));

        crate::ops::create(&sdk, &mut cp).await.unwrap();
        let found = crate::ops::get_by_identity(&sdk, &cp).await.unwrap();

        assert_eq!(found, "cp-id");
    }
}
