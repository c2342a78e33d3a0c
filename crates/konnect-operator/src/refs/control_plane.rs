use std::sync::Arc;

use kube::{runtime::reflector::ObjectRef, ResourceExt};
use tracing::debug;

use super::{lookup, owner::owner_reference, Lookup, RefResolution};
use crate::{
    conditions::{self, reason, CONTROL_PLANE_REF_VALID},
    crd::{ConditionStatus, EntityRef, HasKonnectStatus, KonnectGatewayControlPlane},
    entity::{object_key, KonnectEntity},
    error::{Op, OperatorError, OperatorResult},
    store::KubeStore,
};

/// Fills `status.konnect.controlPlaneID` from `spec.controlPlaneRef`, or
/// from `inherited` (the parent's control plane) when there is no ref.
pub async fn resolve_control_plane<S, K>(
    store: &S,
    obj: &mut K,
    inherited: Option<&str>,
) -> OperatorResult<RefResolution>
where
    S: KubeStore,
    K: KonnectEntity,
{
    if !K::CONTROL_PLANE_SCOPED {
        return Ok(RefResolution::Unset);
    }

    let (name, namespace) = match obj.control_plane_ref().cloned() {
        None => {
            return match inherited {
                Some(id) => {
                    obj.konnect_status_mut().konnect.control_plane_id = id.to_string();
                    Ok(RefResolution::Unset)
                }
                None => {
                    obj.konnect_status_mut().konnect.control_plane_id.clear();
                    let op = if obj.konnect_id().is_empty() {
                        Op::Create
                    } else {
                        Op::Update
                    };
                    Err(OperatorError::MissingControlPlaneId {
                        op,
                        kind: K::KIND,
                        key: object_key(obj),
                    })
                }
            };
        }
        Some(EntityRef::KonnectId { id }) => {
            obj.konnect_status_mut().konnect.control_plane_id = id.clone();
            conditions::set_condition(
                obj,
                CONTROL_PLANE_REF_VALID,
                ConditionStatus::True,
                reason::VALID,
                "",
            );
            return Ok(RefResolution::Resolved {
                owner: None,
                control_plane_id: Some(id),
            });
        }
        Some(EntityRef::NamespacedRef { name, namespace }) => (name, namespace),
    };

    let cp: KonnectGatewayControlPlane =
        match lookup(store, obj, CONTROL_PLANE_REF_VALID, &name, namespace.as_deref()).await {
            Ok(Lookup::Ready(cp)) => cp,
            unresolved => {
                obj.konnect_status_mut().konnect.control_plane_id.clear();
                return unresolved.map(|_| RefResolution::NotReady);
            }
        };

    let id = cp.konnect_id().to_string();
    debug!(kind = K::KIND, key = %object_key(obj), control_plane_id = %id, "resolved control plane");
    obj.konnect_status_mut().konnect.control_plane_id = id.clone();
    conditions::set_condition(
        obj,
        CONTROL_PLANE_REF_VALID,
        ConditionStatus::True,
        reason::VALID,
        "",
    );

    Ok(RefResolution::Resolved {
        owner: owner_reference(&cp),
        control_plane_id: Some(id),
    })
}

/// Objects of kind `K` in the control plane's namespace that reference it by name.
pub fn in_control_plane<K: KonnectEntity>(
    cp: &KonnectGatewayControlPlane,
    candidates: &[Arc<K>],
) -> Vec<ObjectRef<K>> {
    let name = cp.name_any();
    let namespace = cp.namespace();
    candidates
        .iter()
        .filter(|obj| {
            obj.namespace() == namespace
                && matches!(
                    obj.control_plane_ref(),
                    Some(EntityRef::NamespacedRef { name: target, .. }) if *target == name
                )
        })
        .map(|obj| ObjectRef::from_obj(obj.as_ref()))
        .collect()
}
