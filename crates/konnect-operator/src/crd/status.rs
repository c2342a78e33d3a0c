use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Condition status following Kubernetes conventions
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::True => write!(f, "True"),
            Self::False => write!(f, "False"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Kubernetes-style condition. Only trust it when `observed_generation`
/// matches the object's current generation.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: String,

    pub status: ConditionStatus,

    pub reason: String,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub observed_generation: i64,

    pub last_transition_time: DateTime<Utc>,
}

/// Identity of the remote entity this object is mirrored to.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct KonnectEntityStatus {
    /// Empty until the remote entity is confirmed created.
    #[serde(default)]
    pub id: String,

    #[serde(default, rename = "serverURL")]
    pub server_url: String,

    #[serde(default, rename = "orgID")]
    pub org_id: String,

    #[serde(default, rename = "controlPlaneID")]
    pub control_plane_id: String,

    /// Remote ID of the resolved parent (key set, consumer, service).
    #[serde(default, rename = "parentID")]
    pub parent_id: String,
}

/// Status shared by every managed kind.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct KonnectStatus {
    #[serde(default)]
    pub konnect: KonnectEntityStatus,

    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Reference from one managed object to another, or straight to a Konnect ID.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum EntityRef {
    #[serde(rename = "namespacedRef")]
    NamespacedRef {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
    },
    #[serde(rename = "konnectID")]
    KonnectId { id: String },
}

impl EntityRef {
    pub fn namespaced(name: impl Into<String>) -> Self {
        EntityRef::NamespacedRef {
            name: name.into(),
            namespace: None,
        }
    }
}
