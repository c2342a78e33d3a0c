use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{EntityRef, KonnectStatus};

#[derive(CustomResource, Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1",
    kind = "KongConsumer",
    plural = "kongconsumers",
    status = "KonnectStatus",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct KongConsumerSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<EntityRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(CustomResource, Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1beta1",
    kind = "KongConsumerGroup",
    plural = "kongconsumergroups",
    status = "KonnectStatus",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct KongConsumerGroupSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<EntityRef>,

    pub name: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Name of a consumer in the credential's own namespace.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone, JsonSchema)]
pub struct ConsumerRef {
    pub name: String,
}

#[derive(CustomResource, Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongCredentialAPIKey",
    plural = "kongcredentialapikeys",
    status = "KonnectStatus",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct KongCredentialAPIKeySpec {
    pub consumer_ref: ConsumerRef,

    pub key: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(CustomResource, Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongCredentialBasicAuth",
    plural = "kongcredentialbasicauths",
    status = "KonnectStatus",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct KongCredentialBasicAuthSpec {
    pub consumer_ref: ConsumerRef,

    pub username: String,

    pub password: String,

    #[serde(default)]
    pub tags: Vec<String>,
}
