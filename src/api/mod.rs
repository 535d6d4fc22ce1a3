//! Identity provider and directory API access
//!
//! Two narrow seams keep the HTTP details out of the command logic:
//! [`TokenSource`] produces a bearer token and [`PagedLister`] fetches one
//! page of directory entries with it. [`ClientCredentials`] and
//! [`GraphDirectory`] are the reqwest-backed implementations.

pub mod auth;
pub mod client;
pub mod constants;
pub mod models;
pub mod paging;

pub use auth::{AccessToken, ClientCredentials, Credential, TokenSource, acquire_token};
pub use client::{GraphDirectory, build_http_client};
pub use models::{DirectoryEntry, UserCollection};
pub use paging::{Entries, Page, PageErrorPolicy, PageRequest, PagedLister, list_entries};
