use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{EntityRef, KonnectStatus};

/// Plugin configuration. Only mirrored into Konnect through bindings.
#[derive(CustomResource, Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1",
    kind = "KongPlugin",
    plural = "kongplugins",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct KongPluginSpec {
    /// Kong plugin name, e.g. `rate-limiting`.
    pub plugin_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,

    #[serde(default)]
    pub disabled: bool,

    #[serde(default)]
    pub protocols: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone, JsonSchema)]
pub struct PluginRef {
    pub name: String,
}

/// Name of a target in the binding's own namespace.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone, JsonSchema)]
pub struct TargetRef {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PluginBindingTargets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_ref: Option<TargetRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_ref: Option<TargetRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_ref: Option<TargetRef>,
}

/// Plugin and target data gathered while resolving references.
#[derive(Debug, Default, PartialEq, Clone, JsonSchema)]
pub struct ResolvedBinding {
    pub plugin_name: String,
    pub config: Option<Value>,
    pub enabled: bool,
    pub protocols: Vec<String>,
    pub service_id: Option<String>,
    pub route_id: Option<String>,
    pub consumer_id: Option<String>,
}

/// Applies a `KongPlugin` to a service, route or consumer (or a combination).
/// With no target the plugin applies to the whole control plane.
#[derive(CustomResource, Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongPluginBinding",
    plural = "kongpluginbindings",
    status = "KonnectStatus",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct KongPluginBindingSpec {
    /// Taken from the targets when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<EntityRef>,

    pub plugin_ref: PluginRef,

    #[serde(default)]
    pub targets: PluginBindingTargets,

    /// Filled in memory by reference resolution, never stored.
    #[serde(skip)]
    pub resolved: Option<ResolvedBinding>,
}
