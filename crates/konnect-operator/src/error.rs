use std::fmt;

use crate::sdk::SdkError;

pub type OperatorResult<T = (), E = OperatorError> = Result<T, E>;

/// Remote operation kinds, used in error messages and status reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Create,
    Update,
    Delete,
    List,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Create => write!(f, "create"),
            Op::Update => write!(f, "update"),
            Op::Delete => write!(f, "delete"),
            Op::List => write!(f, "list"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OperatorError {
    #[error("Runtime error: {0}")]
    Runtime(#[from] anyhow::Error),

    /// Any error originating from the `kube-rs` crate
    #[error("Kubernetes reported error: {source}")]
    Kube {
        #[from]
        source: kube::Error,
    },

    #[error("Invalid Json: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("can't {op} {kind} {key} without a Konnect ControlPlane ID")]
    MissingControlPlaneId {
        op: Op,
        kind: &'static str,
        key: String,
    },

    #[error("can't {op} {kind} {key} without a resolved {parent} ID")]
    MissingParentRef {
        op: Op,
        kind: &'static str,
        key: String,
        parent: &'static str,
    },

    #[error("can't {op} {kind} {key} without a Konnect ID")]
    MissingKonnectId {
        op: Op,
        kind: &'static str,
        key: String,
    },

    #[error("failed to {op} {kind} {key}: {source}")]
    FailedKonnectOp {
        op: Op,
        kind: &'static str,
        key: String,
        #[source]
        source: SdkError,
    },

    #[error("failed to {op} {kind} {key}: empty response from Konnect")]
    EmptyResponse {
        op: Op,
        kind: &'static str,
        key: String,
    },

    #[error("no {kind} found in Konnect with tag {tag}")]
    IdentityNotFound { kind: &'static str, tag: String },

    #[error("found {count} {kind} entities in Konnect with tag {tag}, expected one")]
    AmbiguousIdentity {
        kind: &'static str,
        tag: String,
        count: usize,
    },

    #[error("referenced {kind} {key} not found")]
    RefNotFound { kind: &'static str, key: String },

    #[error("referenced {kind} {key} is being deleted")]
    RefBeingDeleted { kind: &'static str, key: String },

    #[error("{kind} {key} references {ref_kind} {ref_key} across namespaces, which is not allowed")]
    CrossNamespaceRef {
        kind: &'static str,
        key: String,
        ref_kind: &'static str,
        ref_key: String,
    },

    #[error("{kind} {key} uses ControlPlane {own} but its {ref_kind} belongs to ControlPlane {parent}")]
    ControlPlaneMismatch {
        kind: &'static str,
        key: String,
        ref_kind: &'static str,
        own: String,
        parent: String,
    },
}

impl OperatorError {
    /// Remote rejected a write because the entity already exists.
    pub fn is_remote_conflict(&self) -> bool {
        matches!(self, OperatorError::FailedKonnectOp { source, .. } if source.is_conflict())
    }

    pub fn is_remote_not_found(&self) -> bool {
        matches!(self, OperatorError::FailedKonnectOp { source, .. } if source.is_not_found())
    }

    /// Stale resourceVersion on a Kubernetes write.
    pub fn is_write_conflict(&self) -> bool {
        matches!(
            self,
            OperatorError::Kube {
                source: kube::Error::Api(resp)
            } if resp.code == 409
        )
    }

    /// Nothing to retry until the referenced object changes; its watch wakes us up.
    pub fn awaits_reference_change(&self) -> bool {
        matches!(
            self,
            OperatorError::RefNotFound { .. }
                | OperatorError::RefBeingDeleted { .. }
                | OperatorError::CrossNamespaceRef { .. }
        )
    }
}
