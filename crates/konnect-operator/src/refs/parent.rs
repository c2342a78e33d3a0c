use std::{marker::PhantomData, sync::Arc};

use async_trait::async_trait;
use kube::{runtime::reflector::ObjectRef, ResourceExt};
use tracing::debug;

use super::{lookup, Lookup, RefResolution};
use crate::{
    conditions::{self, reason},
    crd::{ConditionStatus, EntityRef},
    entity::KonnectEntity,
    error::OperatorResult,
    store::KubeStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentInfo {
    pub kind: &'static str,
    pub condition: &'static str,
}

/// How a kind reaches its parent, if it has one.
#[async_trait]
pub trait ParentLink<K: KonnectEntity>: Send + Sync + 'static {
    const PARENT: Option<ParentInfo>;

    /// Fills `status.konnect.parentID` and the parent's RefValid condition.
    async fn resolve<S: KubeStore>(store: &S, child: &mut K) -> OperatorResult<RefResolution>;
}

/// A child kind's view of its parent `P`.
pub trait ChildEntity<P: KonnectEntity>: KonnectEntity {
    const REF_CONDITION: &'static str;

    fn parent_ref(&self) -> Option<EntityRef>;

    /// Whether this object points at the parent named `parent_name`.
    fn references(&self, parent_name: &str) -> bool {
        matches!(self.parent_ref(), Some(EntityRef::NamespacedRef { name, .. }) if name == parent_name)
    }
}

pub struct NoParent;

pub struct Parent<P>(PhantomData<P>);

#[async_trait]
impl<K: KonnectEntity> ParentLink<K> for NoParent {
    const PARENT: Option<ParentInfo> = None;

    async fn resolve<S: KubeStore>(_store: &S, _child: &mut K) -> OperatorResult<RefResolution> {
        Ok(RefResolution::Unset)
    }
}

#[async_trait]
impl<K, P> ParentLink<K> for Parent<P>
where
    K: ChildEntity<P>,
    P: KonnectEntity,
{
    const PARENT: Option<ParentInfo> = Some(ParentInfo {
        kind: P::KIND,
        condition: <K as ChildEntity<P>>::REF_CONDITION,
    });

    async fn resolve<S: KubeStore>(store: &S, child: &mut K) -> OperatorResult<RefResolution> {
        let condition = <K as ChildEntity<P>>::REF_CONDITION;

        let (name, namespace) = match child.parent_ref() {
            None => {
                child.konnect_status_mut().konnect.parent_id.clear();
                conditions::set_condition(
                    child,
                    condition,
                    ConditionStatus::True,
                    reason::VALID,
                    "",
                );
                return Ok(RefResolution::Unset);
            }
            Some(EntityRef::KonnectId { id }) => {
                child.konnect_status_mut().konnect.parent_id = id;
                conditions::set_condition(
                    child,
                    condition,
                    ConditionStatus::True,
                    reason::VALID,
                    "",
                );
                return Ok(RefResolution::Resolved {
                    owner: None,
                    control_plane_id: None,
                });
            }
            Some(EntityRef::NamespacedRef { name, namespace }) => (name, namespace),
        };

        let parent: P = match lookup(store, child, condition, &name, namespace.as_deref()).await {
            Ok(Lookup::Ready(parent)) => parent,
            unresolved => {
                child.konnect_status_mut().konnect.parent_id.clear();
                return unresolved.map(|_| RefResolution::NotReady);
            }
        };

        let parent_id = parent.konnect_id().to_string();
        debug!(
            kind = K::KIND,
            name = %child.name_any(),
            parent = P::KIND,
            %parent_id,
            "resolved parent reference"
        );
        child.konnect_status_mut().konnect.parent_id = parent_id;
        conditions::set_condition(child, condition, ConditionStatus::True, reason::VALID, "");

        let control_plane_id = Some(parent.control_plane_id().to_string()).filter(|id| !id.is_empty());
        Ok(RefResolution::Resolved {
            owner: super::owner::owner_reference(&parent),
            control_plane_id,
        })
    }
}

/// Objects of kind `K` in the parent's namespace that point at it.
pub fn children_of<K, P>(parent: &P, candidates: &[Arc<K>]) -> Vec<ObjectRef<K>>
where
    K: ChildEntity<P>,
    P: KonnectEntity,
{
    let name = parent.name_any();
    let namespace = parent.namespace();
    candidates
        .iter()
        .filter(|c| c.namespace() == namespace && c.references(&name))
        .map(|c| ObjectRef::from_obj(c.as_ref()))
        .collect()
}
