//! Domain types and rules shared by the CRM server and client crates.

pub mod customer;
pub mod error;
pub mod types;
pub mod upload;
