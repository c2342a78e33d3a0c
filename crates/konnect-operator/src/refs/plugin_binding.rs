//! References of a plugin binding: the plugin it applies and the entities
//! it targets. All targets must live in the same control plane.

use std::sync::Arc;

use async_trait::async_trait;
use kube::{runtime::reflector::ObjectRef, ResourceExt};
use tracing::debug;

use super::{lookup, Lookup, ParentInfo, ParentLink, RefResolution};
use crate::{
    conditions::{
        self, reason, CONSUMER_REF_VALID, CONTROL_PLANE_REF_VALID, PLUGIN_REF_VALID,
        ROUTE_REF_VALID, SERVICE_REF_VALID,
    },
    crd::{
        ConditionStatus, KongConsumer, KongPlugin, KongPluginBinding, KongRoute, KongService,
        ResolvedBinding, TargetRef,
    },
    entity::{object_key, KonnectEntity},
    error::{OperatorError, OperatorResult},
    store::KubeStore,
};

pub struct BindingRefs;

enum Target {
    Unset,
    NotReady,
    Ready {
        kind: &'static str,
        condition: &'static str,
        id: String,
        control_plane_id: String,
    },
}

impl Target {
    fn into_id(self) -> Option<String> {
        match self {
            Target::Ready { id, .. } => Some(id),
            _ => None,
        }
    }
}

async fn resolve_plugin<S: KubeStore>(
    store: &S,
    binding: &mut KongPluginBinding,
) -> OperatorResult<KongPlugin> {
    let namespace = binding.namespace().unwrap_or_default();
    let name = binding.spec.plugin_ref.name.clone();
    let key = format!("{namespace}/{name}");

    let (failure, err) = match store.get::<KongPlugin>(&namespace, &name).await? {
        Some(plugin) if plugin.metadata.deletion_timestamp.is_none() => {
            conditions::set_condition(
                binding,
                PLUGIN_REF_VALID,
                ConditionStatus::True,
                reason::VALID,
                "",
            );
            return Ok(plugin);
        }
        Some(_) => (
            reason::BEING_DELETED,
            OperatorError::RefBeingDeleted {
                kind: "KongPlugin",
                key,
            },
        ),
        None => (
            reason::NOT_FOUND,
            OperatorError::RefNotFound {
                kind: "KongPlugin",
                key,
            },
        ),
    };
    conditions::set_condition(
        binding,
        PLUGIN_REF_VALID,
        ConditionStatus::False,
        failure,
        err.to_string(),
    );
    Err(err)
}

async fn resolve_target<S, P>(
    store: &S,
    binding: &mut KongPluginBinding,
    target: Option<TargetRef>,
    condition: &'static str,
) -> OperatorResult<Target>
where
    S: KubeStore,
    P: KonnectEntity,
{
    let Some(target) = target else {
        return Ok(Target::Unset);
    };
    match lookup::<S, KongPluginBinding, P>(store, binding, condition, &target.name, None).await? {
        Lookup::NotReady => Ok(Target::NotReady),
        Lookup::Ready(found) => {
            conditions::set_condition(binding, condition, ConditionStatus::True, reason::VALID, "");
            Ok(Target::Ready {
                kind: P::KIND,
                condition,
                id: found.konnect_id().to_string(),
                control_plane_id: found.control_plane_id().to_string(),
            })
        }
    }
}

/// The one control plane every resolved target lives in.
fn shared_control_plane(
    binding: &mut KongPluginBinding,
    targets: &[Target],
) -> OperatorResult<Option<String>> {
    let mut shared: Option<&str> = None;
    for target in targets {
        let Target::Ready {
            kind,
            condition,
            control_plane_id,
            ..
        } = target
        else {
            continue;
        };
        match shared {
            None => shared = Some(control_plane_id.as_str()),
            Some(cp) if cp == control_plane_id.as_str() => {}
            Some(cp) => {
                let err = OperatorError::ControlPlaneMismatch {
                    kind: KongPluginBinding::KIND,
                    key: object_key(binding),
                    ref_kind: *kind,
                    own: cp.to_string(),
                    parent: control_plane_id.clone(),
                };
                conditions::set_condition(
                    binding,
                    condition,
                    ConditionStatus::False,
                    reason::CONTROL_PLANE_MISMATCH,
                    err.to_string(),
                );
                return Err(err);
            }
        }
    }
    Ok(shared.filter(|id| !id.is_empty()).map(str::to_string))
}

#[async_trait]
impl ParentLink<KongPluginBinding> for BindingRefs {
    const PARENT: Option<ParentInfo> = Some(ParentInfo {
        kind: "target",
        condition: CONTROL_PLANE_REF_VALID,
    });

    async fn resolve<S: KubeStore>(
        store: &S,
        binding: &mut KongPluginBinding,
    ) -> OperatorResult<RefResolution> {
        binding.spec.resolved = None;

        let plugin = resolve_plugin(store, binding).await?;
        let targets = binding.spec.targets.clone();
        let targets = [
            resolve_target::<S, KongService>(store, binding, targets.service_ref, SERVICE_REF_VALID)
                .await?,
            resolve_target::<S, KongRoute>(store, binding, targets.route_ref, ROUTE_REF_VALID)
                .await?,
            resolve_target::<S, KongConsumer>(
                store,
                binding,
                targets.consumer_ref,
                CONSUMER_REF_VALID,
            )
            .await?,
        ];
        if targets.iter().any(|t| matches!(t, Target::NotReady)) {
            return Ok(RefResolution::NotReady);
        }

        let control_plane_id = shared_control_plane(binding, &targets)?;
        let [service_id, route_id, consumer_id] = targets.map(Target::into_id);
        debug!(
            key = %object_key(binding),
            plugin = %plugin.spec.plugin_name,
            ?service_id,
            ?route_id,
            ?consumer_id,
            "resolved plugin binding"
        );
        binding.spec.resolved = Some(ResolvedBinding {
            plugin_name: plugin.spec.plugin_name,
            config: plugin.spec.config,
            enabled: !plugin.spec.disabled,
            protocols: plugin.spec.protocols,
            service_id,
            route_id,
            consumer_id,
        });

        Ok(RefResolution::Resolved {
            owner: None,
            control_plane_id,
        })
    }
}

/// Bindings in the plugin's namespace that apply it.
pub fn bindings_of(
    plugin: &KongPlugin,
    candidates: &[Arc<KongPluginBinding>],
) -> Vec<ObjectRef<KongPluginBinding>> {
    let name = plugin.name_any();
    let namespace = plugin.namespace();
    candidates
        .iter()
        .filter(|b| b.namespace() == namespace && b.spec.plugin_ref.name == name)
        .map(|b| ObjectRef::from_obj(b.as_ref()))
        .collect()
}
