//! Gás do Povo Core
//!
//! Core types and utilities shared across the lookup components.
//!
//! This crate provides:
//! - The classification result model (`QueryOutcome`, `BenefitRecord`)
//! - Identifier (CPF) cleaning and length validation
//! - Error types and result handling

pub mod error;
pub mod identifier;
pub mod types;

pub use error::{Error, Result};
pub use identifier::Identifier;
pub use types::{Attributes, BenefitRecord, QueryOutcome};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::identifier::Identifier;
    pub use crate::types::{Attributes, BenefitRecord, QueryOutcome};
}
