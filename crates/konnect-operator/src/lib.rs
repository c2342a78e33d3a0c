//! Keeps Kong custom resources in sync with Konnect.

pub mod adopt;
pub mod conditions;
pub mod crd;
pub mod entity;
pub mod error;
pub mod operator;
pub mod ops;
pub mod refs;
pub mod sdk;
pub mod store;
pub mod tags;

#[cfg(test)]
mod testing;

pub use error::{OperatorError, OperatorResult};
pub use operator::operator;
