use std::{sync::Arc, time::Duration};

use konnect_common::settings::OperatorArgs;
use kube::{runtime::controller::Action, Resource, ResourceExt};
use tracing::{debug, info, instrument, warn};

use super::{backoff::ErrorBackoff, finalizer};
use crate::{
    adopt,
    conditions::{self, reason, PROGRAMMED},
    crd::ConditionStatus,
    entity::{object_key, KonnectEntity},
    error::{Op, OperatorError, OperatorResult},
    ops,
    refs::{resolve_refs, RefsOutcome},
    sdk::KonnectSdk,
    store::{KubeApiStore, KubeStore},
};

const WRITE_CONFLICT_REQUEUE: Duration = Duration::from_secs(1);

pub struct ContextData<S = KubeApiStore> {
    store: S,
    sdk: Arc<dyn KonnectSdk>,
    sync_period: Duration,
    not_ready_requeue: Duration,
    backoff: ErrorBackoff,
}

impl<S: KubeStore> ContextData<S> {
    pub fn new(store: S, sdk: Arc<dyn KonnectSdk>, args: &OperatorArgs) -> Self {
        Self {
            store,
            sdk,
            sync_period: args.sync_period(),
            not_ready_requeue: args.not_ready_requeue(),
            backoff: ErrorBackoff::new(args.error_backoff_initial(), args.error_backoff_max()),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KonnectAction {
    Sync,
    Delete,
    NoOp,
}

fn determine_action<K: Resource>(obj: &K) -> KonnectAction {
    if obj.meta().deletion_timestamp.is_none() {
        KonnectAction::Sync
    } else if finalizer::has(obj) {
        KonnectAction::Delete
    } else {
        KonnectAction::NoOp
    }
}

fn backoff_key<K: KonnectEntity>(obj: &K) -> String {
    format!("{}/{}", K::KIND, object_key(obj))
}

#[instrument(skip_all, fields(kind = K::KIND, key = %object_key(obj.as_ref())))]
pub async fn reconcile<K, S>(obj: Arc<K>, ctx: Arc<ContextData<S>>) -> OperatorResult<Action>
where
    K: KonnectEntity,
    S: KubeStore,
{
    let key = backoff_key(obj.as_ref());
    // The watch cache may lag behind our own writes.
    let Some(mut obj) = ctx
        .store
        .get::<K>(&obj.namespace().unwrap_or_default(), &obj.name_any())
        .await?
    else {
        ctx.backoff.reset(&key);
        return Ok(Action::await_change());
    };

    match determine_action(&obj) {
        KonnectAction::NoOp => {
            ctx.backoff.reset(&key);
            Ok(Action::await_change())
        }
        KonnectAction::Delete => {
            ops::delete(ctx.sdk.as_ref(), &obj).await?;
            finalizer::delete(&ctx.store, &mut obj).await?;
            ctx.backoff.reset(&key);
            info!("released finalizer after Konnect cleanup");
            Ok(Action::await_change())
        }
        KonnectAction::Sync => sync(&ctx, obj).await,
    }
}

async fn sync<K, S>(ctx: &ContextData<S>, mut obj: K) -> OperatorResult<Action>
where
    K: KonnectEntity,
    S: KubeStore,
{
    let original_status = obj.konnect_status().cloned();
    let original_owners = obj.owner_references().to_vec();

    match resolve_refs(&ctx.store, &mut obj).await {
        Ok(RefsOutcome::Ready) => {}
        Ok(RefsOutcome::NotReady) => {
            debug!("references not programmed yet");
            persist_status(ctx, &obj, original_status.as_ref()).await?;
            return Ok(Action::requeue(ctx.not_ready_requeue));
        }
        Err(err) => {
            if matches!(err, OperatorError::MissingControlPlaneId { .. }) {
                conditions::set_condition(
                    &mut obj,
                    PROGRAMMED,
                    ConditionStatus::Unknown,
                    reason::MISSING_CONTROL_PLANE_ID,
                    err.to_string(),
                );
            }
            persist_status(ctx, &obj, original_status.as_ref()).await?;
            return Err(err);
        }
    }

    let added_finalizer = finalizer::ensure(&mut obj);
    if added_finalizer || obj.owner_references() != original_owners.as_slice() {
        match ctx.store.patch_metadata(&obj).await? {
            // keep the in-memory status, only move to the new revision
            Some(written) => obj.meta_mut().resource_version = written.resource_version(),
            None => return Ok(Action::await_change()),
        }
    }

    let creating = obj.konnect_id().is_empty();
    let result = if creating {
        adopt::create_or_adopt(ctx.sdk.as_ref(), &mut obj).await
    } else {
        adopt::update_or_recreate(ctx.sdk.as_ref(), &mut obj).await
    };

    match &result {
        Ok(()) => {
            record_origin(ctx.sdk.as_ref(), &mut obj).await;
            conditions::set_programmed(&mut obj);
        }
        Err(err) => {
            conditions::set_condition(
                &mut obj,
                PROGRAMMED,
                ConditionStatus::False,
                failure_reason(err, creating),
                err.to_string(),
            );
        }
    }

    persist_status(ctx, &obj, original_status.as_ref()).await?;
    result?;

    ctx.backoff.reset(&backoff_key(&obj));
    Ok(Action::requeue(ctx.sync_period))
}

fn failure_reason(err: &OperatorError, creating: bool) -> &'static str {
    match err {
        OperatorError::FailedKonnectOp { op: Op::Create, .. }
        | OperatorError::EmptyResponse { op: Op::Create, .. } => reason::FAILED_TO_CREATE,
        _ if creating => reason::FAILED_TO_CREATE,
        _ => reason::FAILED_TO_UPDATE,
    }
}

async fn record_origin<K: KonnectEntity>(sdk: &dyn KonnectSdk, obj: &mut K) {
    let org_id = match sdk.organization_id().await {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(error = %e, "unable to read Konnect organization ID");
            None
        }
    };
    let konnect = &mut obj.konnect_status_mut().konnect;
    konnect.server_url = sdk.server_url();
    if let Some(org_id) = org_id {
        konnect.org_id = org_id;
    }
}

async fn persist_status<K, S>(
    ctx: &ContextData<S>,
    obj: &K,
    original: Option<&crate::crd::KonnectStatus>,
) -> OperatorResult
where
    K: KonnectEntity,
    S: KubeStore,
{
    if obj.konnect_status() != original {
        ctx.store.patch_status(obj).await?;
    }
    Ok(())
}

pub fn on_error<K, S>(obj: Arc<K>, error: &OperatorError, ctx: Arc<ContextData<S>>) -> Action
where
    K: KonnectEntity,
    S: KubeStore,
{
    if error.is_write_conflict() {
        debug!(kind = K::KIND, key = %object_key(obj.as_ref()), "stale object, retrying");
        return Action::requeue(WRITE_CONFLICT_REQUEUE);
    }
    if error.awaits_reference_change() {
        warn!(kind = K::KIND, key = %object_key(obj.as_ref()), %error, "waiting for referenced object");
        return Action::await_change();
    }
    let delay = ctx.backoff.next_delay(&backoff_key(obj.as_ref()));
    warn!(
        kind = K::KIND,
        key = %object_key(obj.as_ref()),
        %error,
        retry_in = ?delay,
        "reconciliation failed"
    );
    Action::requeue(delay)
}
