use serde::Serialize;

use crate::{
    crd::{EntityRef, KongUpstream},
    entity::KonnectEntity,
    refs::NoParent,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slots: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_header: Option<String>,
    pub tags: Vec<String>,
}

impl KonnectEntity for KongUpstream {
    type Input = UpstreamInput;
    type Parent = NoParent;

    const KIND: &'static str = "KongUpstream";
    const COLLECTION: &'static str = "upstreams";

    fn spec_tags(&self) -> &[String] {
        &self.spec.tags
    }

    fn control_plane_ref(&self) -> Option<&EntityRef> {
        self.spec.control_plane_ref.as_ref()
    }

    fn to_input(&self, tags: Vec<String>) -> UpstreamInput {
        UpstreamInput {
            name: self.spec.name.clone(),
            algorithm: self.spec.algorithm.clone(),
            slots: self.spec.slots,
            host_header: self.spec.host_header.clone(),
            tags,
        }
    }
}
