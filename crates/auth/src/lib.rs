//! Auth domain module.
//!
//! Holds the authority role-lookup table consumed by the (separate) security
//! layer. Only the record type lives here; there is no authorization logic in
//! this service.

pub mod authority;

pub use authority::Authority;
