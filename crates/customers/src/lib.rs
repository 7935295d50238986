//! Customers domain module.
//!
//! This crate contains the customer record type and its patch shape, as pure
//! domain data (no IO, no HTTP, no storage).

pub mod customer;

pub use customer::{Customer, CustomerPatch};
