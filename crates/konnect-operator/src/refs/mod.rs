//! Reference resolution: control plane and parent references become remote
//! IDs in status, RefValid conditions, and a single family owner reference.

mod control_plane;
pub mod owner;
mod parent;
mod plugin_binding;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::ResourceExt;

pub use control_plane::{in_control_plane, resolve_control_plane};
pub use parent::{children_of, ChildEntity, NoParent, Parent, ParentInfo, ParentLink};
pub use plugin_binding::{bindings_of, BindingRefs};

use crate::{
    conditions::{self, reason},
    crd::ConditionStatus,
    entity::KonnectEntity,
    error::{OperatorError, OperatorResult},
    store::KubeStore,
};

/// Outcome of resolving a single reference.
#[derive(Debug, Clone, PartialEq)]
pub enum RefResolution {
    /// No reference in spec.
    Unset,
    Resolved {
        /// Set when the target is a Kubernetes object.
        owner: Option<OwnerReference>,
        /// Control plane the target lives in, when known.
        control_plane_id: Option<String>,
    },
    /// Target exists but is not programmed yet.
    NotReady,
}

/// Outcome of resolving every reference of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefsOutcome {
    Ready,
    /// Requeue; the target will be programmed eventually.
    NotReady,
}

pub(crate) enum Lookup<P> {
    Ready(P),
    NotReady,
}

/// Fetches a referenced object from the child's namespace and checks that it
/// is usable, recording failures on `condition`.
pub(crate) async fn lookup<S, K, P>(
    store: &S,
    child: &mut K,
    condition: &str,
    name: &str,
    namespace: Option<&str>,
) -> OperatorResult<Lookup<P>>
where
    S: KubeStore,
    K: KonnectEntity,
    P: KonnectEntity,
{
    let child_ns = child.namespace().unwrap_or_default();

    if namespace.is_some_and(|ns| ns != child_ns) {
        let err = OperatorError::CrossNamespaceRef {
            kind: K::KIND,
            key: crate::entity::object_key(child),
            ref_kind: P::KIND,
            ref_key: format!("{}/{name}", namespace.unwrap_or_default()),
        };
        conditions::set_condition(
            child,
            condition,
            ConditionStatus::False,
            reason::INVALID,
            err.to_string(),
        );
        return Err(err);
    }

    let key = format!("{child_ns}/{name}");
    let target = match store.get::<P>(&child_ns, name).await? {
        Some(target) => target,
        None => {
            let err = OperatorError::RefNotFound { kind: P::KIND, key };
            conditions::set_condition(
                child,
                condition,
                ConditionStatus::False,
                reason::NOT_FOUND,
                err.to_string(),
            );
            return Err(err);
        }
    };

    if target.meta().deletion_timestamp.is_some() {
        let err = OperatorError::RefBeingDeleted { kind: P::KIND, key };
        conditions::set_condition(
            child,
            condition,
            ConditionStatus::False,
            reason::BEING_DELETED,
            err.to_string(),
        );
        return Err(err);
    }

    if !conditions::is_programmed(&target) || target.konnect_id().is_empty() {
        conditions::set_condition(
            child,
            condition,
            ConditionStatus::False,
            reason::NOT_READY,
            format!("referenced {} {key} is not programmed yet", P::KIND),
        );
        return Ok(Lookup::NotReady);
    }

    Ok(Lookup::Ready(target))
}

/// Resolves the parent, then the control plane, then reconciles the owner
/// reference. Status and owner references are updated on `obj` in memory.
pub async fn resolve_refs<S, K>(store: &S, obj: &mut K) -> OperatorResult<RefsOutcome>
where
    S: KubeStore,
    K: KonnectEntity,
{
    let parent = <K::Parent as ParentLink<K>>::resolve(store, obj).await?;
    let (parent_owner, parent_cp) = match parent {
        RefResolution::NotReady => return Ok(RefsOutcome::NotReady),
        RefResolution::Unset => (None, None),
        RefResolution::Resolved {
            owner,
            control_plane_id,
        } => (owner, control_plane_id),
    };

    let cp_owner = match resolve_control_plane(store, obj, parent_cp.as_deref()).await? {
        RefResolution::NotReady => return Ok(RefsOutcome::NotReady),
        RefResolution::Unset => None,
        RefResolution::Resolved { owner, .. } => owner,
    };

    if let Some(parent_cp) = parent_cp {
        if parent_cp != obj.control_plane_id() {
            return Err(control_plane_mismatch(obj, parent_cp));
        }
    }

    let desired = parent_owner.or(cp_owner);
    let next = owner::reconcile_owner_refs(obj.owner_references(), desired.as_ref());
    if next.as_slice() != obj.owner_references() {
        obj.meta_mut().owner_references = Some(next);
    }

    Ok(RefsOutcome::Ready)
}

fn control_plane_mismatch<K: KonnectEntity>(obj: &mut K, parent_cp: String) -> OperatorError {
    let (ref_kind, condition) = match <K::Parent as ParentLink<K>>::PARENT {
        Some(info) => (info.kind, info.condition),
        None => ("ControlPlane", conditions::CONTROL_PLANE_REF_VALID),
    };
    let err = OperatorError::ControlPlaneMismatch {
        kind: K::KIND,
        key: crate::entity::object_key(obj),
        ref_kind,
        own: obj.control_plane_id().to_string(),
        parent: parent_cp,
    };
    conditions::set_condition(
        obj,
        condition,
        ConditionStatus::False,
        reason::CONTROL_PLANE_MISMATCH,
        err.to_string(),
    );
    err
}
