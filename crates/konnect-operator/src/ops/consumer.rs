use serde::Serialize;

use super::nested_path;
use crate::{
    conditions::CONSUMER_REF_VALID,
    crd::{
        EntityRef, KongConsumer, KongConsumerGroup, KongCredentialAPIKey, KongCredentialBasicAuth,
    },
    entity::KonnectEntity,
    error::{Op, OperatorResult},
    refs::{ChildEntity, NoParent, Parent},
    sdk::EntityPath,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumerInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    pub tags: Vec<String>,
}

impl KonnectEntity for KongConsumer {
    type Input = ConsumerInput;
    type Parent = NoParent;

    const KIND: &'static str = "KongConsumer";
    const COLLECTION: &'static str = "consumers";

    fn spec_tags(&self) -> &[String] {
        &self.spec.tags
    }

    fn control_plane_ref(&self) -> Option<&EntityRef> {
        self.spec.control_plane_ref.as_ref()
    }

    fn to_input(&self, tags: Vec<String>) -> ConsumerInput {
        ConsumerInput {
            username: self.spec.username.clone(),
            custom_id: self.spec.custom_id.clone(),
            tags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumerGroupInput {
    pub name: String,
    pub tags: Vec<String>,
}

impl KonnectEntity for KongConsumerGroup {
    type Input = ConsumerGroupInput;
    type Parent = NoParent;

    const KIND: &'static str = "KongConsumerGroup";
    const COLLECTION: &'static str = "consumer_groups";

    fn spec_tags(&self) -> &[String] {
        &self.spec.tags
    }

    fn control_plane_ref(&self) -> Option<&EntityRef> {
        self.spec.control_plane_ref.as_ref()
    }

    fn to_input(&self, tags: Vec<String>) -> ConsumerGroupInput {
        ConsumerGroupInput {
            name: self.spec.name.clone(),
            tags,
        }
    }
}

// Credentials live under their consumer and take its control plane.
macro_rules! consumer_credential {
    ($kind:ty, $name:literal, $collection:literal, $input:ty, |$obj:ident, $tags:ident| $body:expr) => {
        impl KonnectEntity for $kind {
            type Input = $input;
            type Parent = Parent<KongConsumer>;

            const KIND: &'static str = $name;
            const COLLECTION: &'static str = $collection;

            fn spec_tags(&self) -> &[String] {
                &self.spec.tags
            }

            fn control_plane_ref(&self) -> Option<&EntityRef> {
                None
            }

            fn to_input(&self, tags: Vec<String>) -> $input {
                let $obj = self;
                let $tags = tags;
                $body
            }

            fn entity_path(&self, op: Op) -> OperatorResult<EntityPath> {
                nested_path(self, op, KongConsumer::COLLECTION, KongConsumer::KIND)
            }
        }

        impl ChildEntity<KongConsumer> for $kind {
            const REF_CONDITION: &'static str = CONSUMER_REF_VALID;

            fn parent_ref(&self) -> Option<EntityRef> {
                Some(EntityRef::namespaced(&self.spec.consumer_ref.name))
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct APIKeyInput {
    pub key: String,
    pub tags: Vec<String>,
}

consumer_credential!(
    KongCredentialAPIKey,
    "KongCredentialAPIKey",
    "key-auth",
    APIKeyInput,
    |cred, tags| APIKeyInput {
        key: cred.spec.key.clone(),
        tags,
    }
);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicAuthInput {
    pub username: String,
    pub password: String,
    pub tags: Vec<String>,
}

consumer_credential!(
    KongCredentialBasicAuth,
    "KongCredentialBasicAuth",
    "basic-auth",
    BasicAuthInput,
    |cred, tags| BasicAuthInput {
        username: cred.spec.username.clone(),
        password: cred.spec.password.clone(),
        tags,
    }
);
