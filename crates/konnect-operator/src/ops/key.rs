use serde::Serialize;

use super::{id_ref, IdRef};
use crate::{
    conditions::KEY_SET_REF_VALID,
    crd::{EntityRef, HasKonnectStatus, KongKey, KongKeySet},
    entity::KonnectEntity,
    refs::{ChildEntity, NoParent, Parent},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeySetInput {
    pub name: String,
    pub tags: Vec<String>,
}

impl KonnectEntity for KongKeySet {
    type Input = KeySetInput;
    type Parent = NoParent;

    const KIND: &'static str = "KongKeySet";
    const COLLECTION: &'static str = "key-sets";

    fn spec_tags(&self) -> &[String] {
        &self.spec.tags
    }

    fn control_plane_ref(&self) -> Option<&EntityRef> {
        self.spec.control_plane_ref.as_ref()
    }

    fn to_input(&self, tags: Vec<String>) -> KeySetInput {
        KeySetInput {
            name: self.spec.name.clone(),
            tags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PemInput {
    pub private_key: String,
    pub public_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyInput {
    pub kid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pem: Option<PemInput>,
    /// Unset detaches the key from any key set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<IdRef>,
    pub tags: Vec<String>,
}

impl KonnectEntity for KongKey {
    type Input = KeyInput;
    type Parent = Parent<KongKeySet>;

    const KIND: &'static str = "KongKey";
    const COLLECTION: &'static str = "keys";

    fn spec_tags(&self) -> &[String] {
        &self.spec.tags
    }

    fn control_plane_ref(&self) -> Option<&EntityRef> {
        self.spec.control_plane_ref.as_ref()
    }

    fn to_input(&self, tags: Vec<String>) -> KeyInput {
        KeyInput {
            kid: self.spec.kid.clone(),
            name: self.spec.name.clone(),
            jwk: self.spec.jwk.clone(),
            pem: self.spec.pem.as_ref().map(|pem| PemInput {
                private_key: pem.private_key.clone(),
                public_key: pem.public_key.clone(),
            }),
            set: id_ref(self.parent_id()),
            tags,
        }
    }
}

impl ChildEntity<KongKeySet> for KongKey {
    const REF_CONDITION: &'static str = KEY_SET_REF_VALID;

    fn parent_ref(&self) -> Option<EntityRef> {
        self.spec.key_set_ref.clone()
    }
}
