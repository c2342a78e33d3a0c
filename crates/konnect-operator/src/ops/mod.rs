//! Entity operations, generic over [`KonnectEntity`].
//!
//! They only touch the passed object's `status.konnect` and the remote API.
//! Conditions and adoption are the reconciler's concern.

mod certificate;
mod consumer;
mod control_plane;
mod key;
mod plugin;
mod service;
mod upstream;

pub use certificate::*;
pub use consumer::*;
pub use control_plane::*;
pub use key::*;
pub use plugin::*;
pub use service::*;
pub use upstream::*;

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    entity::{object_key, KonnectEntity},
    error::{Op, OperatorError, OperatorResult},
    sdk::{EntityPath, KonnectSdk, SdkError},
    tags::{generate_tags, uid_tag},
};

/// `{"id": …}` reference embedded in request bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdRef {
    pub id: String,
}

/// `None` for an unresolved (empty) ID.
pub(crate) fn id_ref(id: &str) -> Option<IdRef> {
    (!id.is_empty()).then(|| IdRef { id: id.to_string() })
}

/// Path under a parent entity, e.g. a consumer's credentials.
pub(crate) fn nested_path<K: KonnectEntity>(
    obj: &K,
    op: Op,
    parent_collection: &'static str,
    parent: &'static str,
) -> OperatorResult<EntityPath> {
    let control_plane_id = obj.control_plane_id();
    if control_plane_id.is_empty() {
        return Err(OperatorError::MissingControlPlaneId {
            op,
            kind: K::KIND,
            key: object_key(obj),
        });
    }
    let parent_id = obj.parent_id();
    if parent_id.is_empty() {
        return Err(OperatorError::MissingParentRef {
            op,
            kind: K::KIND,
            key: object_key(obj),
            parent,
        });
    }
    Ok(EntityPath::Nested {
        control_plane_id: control_plane_id.to_string(),
        parent_collection,
        parent_id: parent_id.to_string(),
        collection: K::COLLECTION,
    })
}

fn failed<K: KonnectEntity>(op: Op, obj: &K, source: SdkError) -> OperatorError {
    OperatorError::FailedKonnectOp {
        op,
        kind: K::KIND,
        key: object_key(obj),
        source,
    }
}

fn request_body<K: KonnectEntity>(obj: &K) -> OperatorResult<serde_json::Value> {
    let tags = generate_tags(obj, obj.spec_tags());
    Ok(serde_json::to_value(obj.to_input(tags))?)
}

/// Creates the remote entity and stores its ID in status.
pub async fn create<K: KonnectEntity>(sdk: &dyn KonnectSdk, obj: &mut K) -> OperatorResult {
    let path = obj.entity_path(Op::Create)?;
    let body = request_body(obj)?;

    let created = sdk
        .create(&path, body)
        .await
        .map_err(|e| failed(Op::Create, obj, e))?;

    let id = created
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| OperatorError::EmptyResponse {
            op: Op::Create,
            kind: K::KIND,
            key: object_key(obj),
        })?;

    info!(kind = K::KIND, key = %object_key(obj), %id, "created entity in Konnect");
    obj.konnect_status_mut().konnect.id = id;
    Ok(())
}

/// Upserts by the ID in status. A remote 404 comes back as a
/// `FailedKonnectOp` for which `is_remote_not_found()` holds.
///
/// Preconditions are checked in order: an empty control plane ID fails with
/// `MissingControlPlaneId`, then an empty Konnect ID with `MissingKonnectId`.
/// Neither reaches the remote API.
pub async fn update<K: KonnectEntity>(sdk: &dyn KonnectSdk, obj: &mut K) -> OperatorResult {
    let path = obj.entity_path(Op::Update)?;
    let id = obj.konnect_id().to_string();
    if id.is_empty() {
        return Err(OperatorError::MissingKonnectId {
            op: Op::Update,
            kind: K::KIND,
            key: object_key(obj),
        });
    }
    let body = request_body(obj)?;

    sdk.upsert(&path, &id, body)
        .await
        .map_err(|e| failed(Op::Update, obj, e))?;

    debug!(kind = K::KIND, key = %object_key(obj), %id, "updated entity in Konnect");
    Ok(())
}

/// Idempotent: no ID, or a remote 404, both count as deleted.
pub async fn delete<K: KonnectEntity>(sdk: &dyn KonnectSdk, obj: &K) -> OperatorResult {
    let id = obj.konnect_id();
    if id.is_empty() {
        debug!(kind = K::KIND, key = %object_key(obj), "no Konnect ID, nothing to delete");
        return Ok(());
    }
    let path = obj.entity_path(Op::Delete)?;

    match sdk.delete(&path, id).await {
        Ok(()) => {
            info!(kind = K::KIND, key = %object_key(obj), %id, "deleted entity in Konnect");
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            info!(
                op = %Op::Delete,
                kind = K::KIND,
                %id,
                "entity not found in Konnect, skipping delete"
            );
            Ok(())
        }
        Err(e) => Err(failed(Op::Delete, obj, e)),
    }
}

/// Finds the remote entity tagged with this object's UID. Exactly one match
/// is required.
pub async fn get_by_identity<K: KonnectEntity>(
    sdk: &dyn KonnectSdk,
    obj: &K,
) -> OperatorResult<String> {
    let path = obj.entity_path(Op::List)?;
    let found = sdk
        .list(&path, &obj.list_filter())
        .await
        .map_err(|e| failed(Op::List, obj, e))?;

    let mut ids: Vec<String> = found
        .into_iter()
        .filter_map(|e| e.id)
        .filter(|id| !id.is_empty())
        .collect();

    match ids.len() {
        0 => Err(OperatorError::IdentityNotFound {
            kind: K::KIND,
            tag: uid_tag(obj),
        }),
        1 => Ok(ids.remove(0)),
        count => Err(OperatorError::AmbiguousIdentity {
            kind: K::KIND,
            tag: uid_tag(obj),
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        crd::{HasKonnectStatus, KongUpstream, KongUpstreamSpec},
        sdk::{ListFilter, MockKonnectSdk, RemoteEntity},
        testing::{meta, with_konnect},
    };
    use serde_json::json;

    fn upstream(control_plane_id: &str, id: &str) -> KongUpstream {
        let mut up = KongUpstream::new(
            "svc-1",
            KongUpstreamSpec {
                name: "svc-1".to_string(),
                ..Default::default()
            },
        );
        up.metadata = meta("svc-1", "default");
        with_konnect(up, id, control_plane_id)
    }

    #[tokio::test]
    async fn test_create_stores_remote_id() {
        let mut up = upstream("123456789", "");
        let mut sdk = MockKonnectSdk::new();
        sdk.expect_create()
            .withf(|path, body| {
                path.control_plane_id() == Some("123456789")
                    && body["name"] == json!("svc-1")
                    && body["tags"]
                        .as_array()
                        .is_some_and(|t| t.contains(&json!("k8s-uid:uid-svc-1")))
            })
            .times(1)
            .returning(|_, _| Ok(RemoteEntity::with_id("12345")));

        create(&sdk, &mut up).await.unwrap();

        assert_eq!(up.konnect_id(), "12345");
        // conditions are not this layer's job
        assert!(up.conditions().is_empty());
    }

    #[tokio::test]
    async fn test_create_without_control_plane_never_calls_remote() {
        let mut up = upstream("", "");
        let sdk = MockKonnectSdk::new();

        let err = create(&sdk, &mut up).await.unwrap_err();

        assert!(matches!(err, OperatorError::MissingControlPlaneId { .. }));
        assert_eq!(
            err.to_string(),
            "can't create KongUpstream default/svc-1 without a Konnect ControlPlane ID"
        );
        assert_eq!(up.konnect_id(), "");
    }

    #[tokio::test]
    async fn test_create_failure_leaves_status_untouched() {
        let mut up = upstream("123456789", "");
        let mut sdk = MockKonnectSdk::new();
        sdk.expect_create().times(1).returning(|_, _| {
            Err(SdkError::BadRequest {
                status: 400,
                body: r#"{"status":400,"detail":"bad request"}"#.to_string(),
            })
        });

        let err = create(&sdk, &mut up).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            r#"failed to create KongUpstream default/svc-1: {"status":400,"detail":"bad request"}"#
        );
        assert_eq!(up.konnect_id(), "");
    }

    #[tokio::test]
    async fn test_create_with_empty_response() {
        let mut up = upstream("123456789", "");
        let mut sdk = MockKonnectSdk::new();
        sdk.expect_create()
            .returning(|_, _| Ok(RemoteEntity::default()));

        let err = create(&sdk, &mut up).await.unwrap_err();

        assert!(matches!(err, OperatorError::EmptyResponse { .. }));
    }

    #[tokio::test]
    async fn test_update_not_found_is_distinguishable() {
        let mut up = upstream("123456789", "stale");
        let mut sdk = MockKonnectSdk::new();
        sdk.expect_upsert()
            .withf(|_, id, _| id == "stale")
            .times(1)
            .returning(|_, _, _| Err(SdkError::NotFound("entity not found".to_string())));

        let err = update(&sdk, &mut up).await.unwrap_err();

        assert!(err.is_remote_not_found());
        assert_eq!(up.konnect_id(), "stale");
    }

    #[tokio::test]
    async fn test_update_requires_konnect_id() {
        let mut up = upstream("123456789", "");
        let sdk = MockKonnectSdk::new();

        let err = update(&sdk, &mut up).await.unwrap_err();

        assert!(matches!(err, OperatorError::MissingKonnectId { .. }));
    }

    #[tokio::test]
    async fn test_update_checks_control_plane_before_konnect_id() {
        let mut up = upstream("", "");
        let sdk = MockKonnectSdk::new();

        let err = update(&sdk, &mut up).await.unwrap_err();

        assert!(matches!(
            err,
            OperatorError::MissingControlPlaneId { op: Op::Update, .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let up = upstream("12345", "123456789");
        let mut sdk = MockKonnectSdk::new();
        let mut calls = 0;
        sdk.expect_delete()
            .withf(|path, id| path.control_plane_id() == Some("12345") && id == "123456789")
            .times(2)
            .returning(move |_, _| {
                calls += 1;
                if calls == 1 {
                    Ok(())
                } else {
                    Err(SdkError::NotFound("gone".to_string()))
                }
            });

        delete(&sdk, &up).await.unwrap();
        delete(&sdk, &up).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_without_id_is_a_noop() {
        let up = upstream("12345", "");
        let sdk = MockKonnectSdk::new();

        delete(&sdk, &up).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_failure_is_wrapped() {
        let up = upstream("12345", "123456789");
        let mut sdk = MockKonnectSdk::new();
        sdk.expect_delete().returning(|_, _| {
            Err(SdkError::Api {
                status_code: 500,
                message: "Server Error".to_string(),
                body: String::new(),
            })
        });

        let err = delete(&sdk, &up).await.unwrap_err();

        assert!(matches!(
            err,
            OperatorError::FailedKonnectOp { op: Op::Delete, .. }
        ));
    }

    #[tokio::test]
    async fn test_get_by_identity_filters_on_uid_tag() {
        let up = upstream("12345", "");
        let mut sdk = MockKonnectSdk::new();
        sdk.expect_list()
            .withf(|_, filter| *filter == ListFilter::Tags("k8s-uid:uid-svc-1".to_string()))
            .returning(|_, _| Ok(vec![RemoteEntity::with_id("id-conflict")]));

        assert_eq!(get_by_identity(&sdk, &up).await.unwrap(), "id-conflict");
    }

    #[tokio::test]
    async fn test_get_by_identity_zero_or_many() {
        let up = upstream("12345", "");

        let mut none = MockKonnectSdk::new();
        none.expect_list().returning(|_, _| Ok(vec![]));
        assert!(matches!(
            get_by_identity(&none, &up).await,
            Err(OperatorError::IdentityNotFound { .. })
        ));

        let mut many = MockKonnectSdk::new();
        many.expect_list()
            .returning(|_, _| Ok(vec![RemoteEntity::with_id("a"), RemoteEntity::with_id("b")]));
        assert!(matches!(
            get_by_identity(&many, &up).await,
            Err(OperatorError::AmbiguousIdentity { count: 2, .. })
        ));
    }
}
