use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{EntityRef, KonnectStatus};

#[derive(CustomResource, Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongCertificate",
    plural = "kongcertificates",
    status = "KonnectStatus",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct KongCertificateSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<EntityRef>,

    pub cert: String,

    pub key: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(CustomResource, Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongCACertificate",
    plural = "kongcacertificates",
    status = "KonnectStatus",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct KongCACertificateSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<EntityRef>,

    pub cert: String,

    #[serde(default)]
    pub tags: Vec<String>,
}
