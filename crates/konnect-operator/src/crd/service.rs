use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{EntityRef, KonnectStatus};

#[derive(CustomResource, Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongService",
    plural = "kongservices",
    status = "KonnectStatus",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct KongServiceSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<EntityRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub host: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(CustomResource, Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongRoute",
    plural = "kongroutes",
    status = "KonnectStatus",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct KongRouteSpec {
    /// Only needed for service-less routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<EntityRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_ref: Option<EntityRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub paths: Vec<String>,

    #[serde(default)]
    pub hosts: Vec<String>,

    #[serde(default)]
    pub methods: Vec<String>,

    #[serde(default)]
    pub protocols: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_path: Option<bool>,

    #[serde(default)]
    pub tags: Vec<String>,
}
