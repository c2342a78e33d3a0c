//! Status projection: condition types, reasons and the helpers writing them.

use chrono::Utc;
use kube::Resource;

use crate::crd::{Condition, ConditionStatus, HasKonnectStatus};

pub const PROGRAMMED: &str = "Programmed";
pub const CONTROL_PLANE_REF_VALID: &str = "ControlPlaneRefValid";
pub const KEY_SET_REF_VALID: &str = "KeySetRefValid";
pub const CONSUMER_REF_VALID: &str = "KongConsumerRefValid";
pub const SERVICE_REF_VALID: &str = "KongServiceRefValid";
pub const ROUTE_REF_VALID: &str = "KongRouteRefValid";
pub const PLUGIN_REF_VALID: &str = "KongPluginRefValid";

pub mod reason {
    pub const PROGRAMMED: &str = "Programmed";
    pub const FAILED_TO_CREATE: &str = "FailedToCreate";
    pub const FAILED_TO_UPDATE: &str = "FailedToUpdate";
    pub const MISSING_CONTROL_PLANE_ID: &str = "MissingControlPlaneID";

    pub const VALID: &str = "Valid";
    pub const INVALID: &str = "Invalid";
    pub const NOT_FOUND: &str = "NotFound";
    pub const NOT_READY: &str = "NotReady";
    pub const BEING_DELETED: &str = "BeingDeleted";
    pub const CONTROL_PLANE_MISMATCH: &str = "ControlPlaneMismatch";
}

/// Upserts a condition by type. `lastTransitionTime` only moves when the
/// status flips.
pub fn set_condition<K>(
    obj: &mut K,
    type_: &str,
    status: ConditionStatus,
    reason: &str,
    message: impl Into<String>,
) where
    K: Resource + HasKonnectStatus,
{
    let generation = obj.meta().generation.unwrap_or_default();
    let message = message.into();
    let conditions = &mut obj.konnect_status_mut().conditions;

    match conditions.iter_mut().find(|c| c.type_ == type_) {
        Some(existing) => {
            if existing.status != status {
                existing.last_transition_time = Utc::now();
            }
            existing.status = status;
            existing.reason = reason.to_string();
            existing.message = message;
            existing.observed_generation = generation;
        }
        None => conditions.push(Condition {
            type_: type_.to_string(),
            status,
            reason: reason.to_string(),
            message,
            observed_generation: generation,
            last_transition_time: Utc::now(),
        }),
    }
}

pub fn get_condition<'a, K: HasKonnectStatus>(obj: &'a K, type_: &str) -> Option<&'a Condition> {
    obj.conditions().iter().find(|c| c.type_ == type_)
}

/// True only for a Programmed condition evaluated at the current generation.
pub fn is_programmed<K>(obj: &K) -> bool
where
    K: Resource + HasKonnectStatus,
{
    let generation = obj.meta().generation.unwrap_or_default();
    get_condition(obj, PROGRAMMED)
        .map(|c| c.status == ConditionStatus::True && c.observed_generation == generation)
        .unwrap_or(false)
}

pub fn set_programmed<K>(obj: &mut K)
where
    K: Resource + HasKonnectStatus,
{
    set_condition(obj, PROGRAMMED, ConditionStatus::True, reason::PROGRAMMED, "");
}
