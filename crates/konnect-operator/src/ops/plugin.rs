use serde::Serialize;
use serde_json::Value;

use super::{id_ref, IdRef};
use crate::{
    conditions::{CONSUMER_REF_VALID, ROUTE_REF_VALID, SERVICE_REF_VALID},
    crd::{EntityRef, KongConsumer, KongPluginBinding, KongRoute, KongService},
    entity::{control_plane_path, object_key, KonnectEntity},
    error::{Op, OperatorError, OperatorResult},
    refs::{BindingRefs, ChildEntity},
    sdk::EntityPath,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<IdRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<IdRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumer: Option<IdRef>,
    pub tags: Vec<String>,
}

impl KonnectEntity for KongPluginBinding {
    type Input = PluginInput;
    type Parent = BindingRefs;

    const KIND: &'static str = "KongPluginBinding";
    const COLLECTION: &'static str = "plugins";

    fn spec_tags(&self) -> &[String] {
        &[]
    }

    fn control_plane_ref(&self) -> Option<&EntityRef> {
        self.spec.control_plane_ref.as_ref()
    }

    fn to_input(&self, tags: Vec<String>) -> PluginInput {
        let resolved = self.spec.resolved.clone().unwrap_or_default();
        PluginInput {
            name: resolved.plugin_name,
            config: resolved.config,
            enabled: resolved.enabled,
            protocols: resolved.protocols,
            service: resolved.service_id.as_deref().and_then(id_ref),
            route: resolved.route_id.as_deref().and_then(id_ref),
            consumer: resolved.consumer_id.as_deref().and_then(id_ref),
            tags,
        }
    }

    /// Writes need the plugin resolved in this pass; deletes only need the ID.
    fn entity_path(&self, op: Op) -> OperatorResult<EntityPath> {
        if matches!(op, Op::Create | Op::Update) && self.spec.resolved.is_none() {
            return Err(OperatorError::MissingParentRef {
                op,
                kind: Self::KIND,
                key: object_key(self),
                parent: "KongPlugin",
            });
        }
        control_plane_path(self, op)
    }
}

macro_rules! binding_target {
    ($target:ty, $field:ident, $condition:expr) => {
        impl ChildEntity<$target> for KongPluginBinding {
            const REF_CONDITION: &'static str = $condition;

            fn parent_ref(&self) -> Option<EntityRef> {
                self.spec
                    .targets
                    .$field
                    .as_ref()
                    .map(|t| EntityRef::namespaced(&t.name))
            }
        }
    };
}

binding_target!(KongService, service_ref, SERVICE_REF_VALID);
binding_target!(KongRoute, route_ref, ROUTE_REF_VALID);
binding_target!(KongConsumer, consumer_ref, CONSUMER_REF_VALID);
