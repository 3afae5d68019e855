//! Client for the customer records API.
//!
//! [`api::CustomerApi`] maps each operation onto one HTTP request (or one per
//! id for bulk deletes). [`queries::CustomerQueries`] layers a
//! [`cache::QueryCache`] on top so repeated reads of the customer list are
//! served locally until a mutation invalidates them.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod form;
pub mod queries;
pub mod search;

pub use api::{CustomerApi, DeleteTarget};
pub use cache::{QueryCache, QueryKey};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use form::{CustomerForm, ImageFile};
pub use queries::CustomerQueries;
