//! Identity tags attached to every remote entity.
//!
//! `k8s-uid:<uid>` is the only tag used to find an entity again; the others
//! are informational and may change between generations.

use std::collections::{BTreeMap, BTreeSet};

use kube::{Resource, ResourceExt};

/// Comma separated user tags, merged with `spec.tags`.
pub const TAGS_ANNOTATION: &str = "konghq.com/tags";

const UID_TAG_PREFIX: &str = "k8s-uid:";

pub fn uid_tag<K: Resource>(obj: &K) -> String {
    format!("{UID_TAG_PREFIX}{}", obj.uid().unwrap_or_default())
}

/// Deterministic, sorted, de-duplicated tag set for `obj`.
pub fn generate_tags<K>(obj: &K, spec_tags: &[String]) -> Vec<String>
where
    K: Resource<DynamicType = ()>,
{
    let mut tags: BTreeSet<String> = user_tags(obj, spec_tags).collect();
    tags.extend(identity(obj).into_iter().map(|(k, v)| format!("{k}:{v}")));
    tags.into_iter().collect()
}

/// Identity tags as key/value pairs, for APIs taking labels instead of tags.
pub fn identity_labels<K>(obj: &K) -> BTreeMap<String, String>
where
    K: Resource<DynamicType = ()>,
{
    identity(obj)
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn identity<K>(obj: &K) -> [(&'static str, String); 7]
where
    K: Resource<DynamicType = ()>,
{
    [
        ("k8s-kind", K::kind(&()).to_string()),
        ("k8s-name", obj.name_any()),
        ("k8s-namespace", obj.namespace().unwrap_or_default()),
        ("k8s-uid", obj.uid().unwrap_or_default()),
        ("k8s-generation", obj.meta().generation.unwrap_or_default().to_string()),
        ("k8s-group", K::group(&()).to_string()),
        ("k8s-version", K::version(&()).to_string()),
    ]
}

fn user_tags<'a, K: Resource>(
    obj: &'a K,
    spec_tags: &'a [String],
) -> impl Iterator<Item = String> + 'a {
    let annotated = obj
        .annotations()
        .get(TAGS_ANNOTATION)
        .map(|raw| raw.split(',').collect::<Vec<_>>())
        .unwrap_or_default();

    annotated
        .into_iter()
        .chain(spec_tags.iter().map(String::as_str))
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && !tag.starts_with(UID_TAG_PREFIX))
        .map(str::to_string)
}
