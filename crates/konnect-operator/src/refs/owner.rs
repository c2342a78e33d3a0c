//! Owner references of the "controlling parent" family.
//!
//! A managed object is owned by at most one other managed object: its
//! resolved parent if it has one, otherwise its control plane.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::Resource;

use crate::crd::{CONFIGURATION_GROUP, KONNECT_GROUP};

/// Owner reference to `owner` with `blockOwnerDeletion` set.
pub fn owner_reference<P: Resource<DynamicType = ()>>(owner: &P) -> Option<OwnerReference> {
    owner.owner_ref(&()).map(|mut r| {
        r.block_owner_deletion = Some(true);
        r
    })
}

fn in_family(r: &OwnerReference) -> bool {
    let group = r.api_version.split_once('/').map(|(g, _)| g).unwrap_or_default();
    group == KONNECT_GROUP || group == CONFIGURATION_GROUP
}

fn same_target(a: &OwnerReference, b: &OwnerReference) -> bool {
    a.api_version == b.api_version && a.kind == b.kind && a.name == b.name
}

/// Next owner references: every family member other than `desired` is
/// dropped, `desired` is added or refreshed in place, foreign owners stay.
pub fn reconcile_owner_refs(
    current: &[OwnerReference],
    desired: Option<&OwnerReference>,
) -> Vec<OwnerReference> {
    let mut next = Vec::with_capacity(current.len() + 1);
    let mut placed = false;

    for r in current {
        if !in_family(r) {
            next.push(r.clone());
            continue;
        }
        if let Some(d) = desired {
            if !placed && same_target(r, d) {
                next.push(d.clone());
                placed = true;
            }
        }
    }

    if let (Some(d), false) = (desired, placed) {
        next.push(d.clone());
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(api_version: &str, kind: &str, name: &str) -> OwnerReference {
        OwnerReference {
            api_version: api_version.to_string(),
            kind: kind.to_string(),
            name: name.to_string(),
            uid: format!("uid-{name}"),
            block_owner_deletion: Some(true),
            ..Default::default()
        }
    }

    fn cp(name: &str) -> OwnerReference {
        owner("konnect.konghq.com/v1alpha1", "KonnectGatewayControlPlane", name)
    }

    fn key_set(name: &str) -> OwnerReference {
        owner("configuration.konghq.com/v1alpha1", "KongKeySet", name)
    }

    #[test]
    fn test_parent_replaces_control_plane() {
        let next = reconcile_owner_refs(&[cp("cp-1")], Some(&key_set("key-set-2")));
        assert_eq!(next, vec![key_set("key-set-2")]);
    }

    #[test]
    fn test_idempotent() {
        let desired = key_set("key-set-2");
        let once = reconcile_owner_refs(&[], Some(&desired));
        let twice = reconcile_owner_refs(&once, Some(&desired));
        assert_eq!(once, twice);
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn test_foreign_owners_are_kept() {
        let foreign = owner("apps/v1", "Deployment", "kong");
        let next = reconcile_owner_refs(
            &[foreign.clone(), key_set("a"), key_set("b")],
            Some(&cp("cp-1")),
        );
        assert_eq!(next, vec![foreign, cp("cp-1")]);
    }

    #[test]
    fn test_no_desired_owner_clears_family() {
        let next = reconcile_owner_refs(&[cp("cp-1")], None);
        assert!(next.is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        let next = reconcile_owner_refs(&[cp("cp-1"), cp("cp-1")], Some(&cp("cp-1")));
        assert_eq!(next, vec![cp("cp-1")]);
    }
}
