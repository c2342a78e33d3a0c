use kube::{Resource, ResourceExt};

use crate::{entity::KonnectEntity, error::OperatorResult, store::KubeStore};

/// Held until the remote entity is gone.
pub const KONNECT_CLEANUP_FINALIZER: &str = "konnect.konghq.com/delete";

pub fn has<K: Resource>(obj: &K) -> bool {
    obj.finalizers().iter().any(|f| f == KONNECT_CLEANUP_FINALIZER)
}

/// Adds the finalizer in memory. Returns whether it was missing.
pub fn ensure<K: Resource>(obj: &mut K) -> bool {
    if has(obj) {
        return false;
    }
    obj.finalizers_mut().push(KONNECT_CLEANUP_FINALIZER.to_string());
    true
}

/// Drops the finalizer and writes it back. `None` once the object is gone.
pub async fn delete<S, K>(store: &S, obj: &mut K) -> OperatorResult<Option<K>>
where
    S: KubeStore,
    K: KonnectEntity,
{
    obj.finalizers_mut().retain(|f| f != KONNECT_CLEANUP_FINALIZER);
    store.patch_metadata(obj).await
}
