use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{EntityRef, KonnectStatus};

#[derive(CustomResource, Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongKeySet",
    plural = "kongkeysets",
    status = "KonnectStatus",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct KongKeySetSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<EntityRef>,

    pub name: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PemKeyPair {
    pub private_key: String,
    pub public_key: String,
}

#[derive(CustomResource, Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongKey",
    plural = "kongkeys",
    status = "KonnectStatus",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct KongKeySpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<EntityRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_set_ref: Option<EntityRef>,

    pub kid: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwk: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pem: Option<PemKeyPair>,

    #[serde(default)]
    pub tags: Vec<String>,
}
