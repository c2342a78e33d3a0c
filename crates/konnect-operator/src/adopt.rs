//! Recovery paths around create and update.
//!
//! A create that collides with an existing remote entity adopts it when the
//! `k8s-uid` tag lookup finds exactly one match. An update whose remote
//! entity vanished falls back to create.

use tracing::{info, warn};

use crate::{
    entity::{object_key, KonnectEntity},
    error::OperatorResult,
    ops,
    sdk::KonnectSdk,
};

pub async fn create_or_adopt<K: KonnectEntity>(sdk: &dyn KonnectSdk, obj: &mut K) -> OperatorResult {
    let err = match ops::create(sdk, obj).await {
        Ok(()) => return Ok(()),
        Err(err) if err.is_remote_conflict() => err,
        Err(err) => return Err(err),
    };

    match ops::get_by_identity(sdk, obj).await {
        Ok(id) => {
            info!(kind = K::KIND, key = %object_key(obj), %id, "adopted existing entity in Konnect");
            obj.konnect_status_mut().konnect.id = id;
            Ok(())
        }
        Err(lookup) => {
            warn!(
                kind = K::KIND,
                key = %object_key(obj),
                error = %lookup,
                "create conflicted and no single entity to adopt"
            );
            Err(err)
        }
    }
}

pub async fn update_or_recreate<K: KonnectEntity>(
    sdk: &dyn KonnectSdk,
    obj: &mut K,
) -> OperatorResult {
    match ops::update(sdk, obj).await {
        Err(err) if err.is_remote_not_found() => {
            info!(
                kind = K::KIND,
                key = %object_key(obj),
                id = %obj.konnect_id(),
                "entity missing in Konnect, creating it again"
            );
            obj.konnect_status_mut().konnect.id.clear();
            create_or_adopt(sdk, obj).await
        }
        other => other,
    }
}
