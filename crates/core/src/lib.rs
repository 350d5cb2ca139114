//! Domain layer for the case-management backend: shared id/timestamp
//! types, the error taxonomy, case enumerations and request validation,
//! and the list-filter builder.

pub mod case;
pub mod error;
pub mod filter;
pub mod types;
