use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::KonnectStatus;

#[derive(CustomResource, Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "konnect.konghq.com",
    version = "v1alpha1",
    kind = "KonnectGatewayControlPlane",
    plural = "konnectgatewaycontrolplanes",
    shortname = "kocp",
    status = "KonnectStatus",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct KonnectGatewayControlPlaneSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_type: Option<String>,

    /// Konnect labels. Identity labels are added on top.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}
