//! Typed Rust client for the Telerivet REST API.
//!
//! The crate is layered like the API itself: a transport layer for wire-format
//! details (bracket query strings, gzip bodies, the error envelope), a client that
//! performs authenticated requests, lazily loaded entities with minimal-diff saves,
//! and cursors that page through collections.
//!
//! ```rust,no_run
//! use telerivet::{Auth, Entity, Params, TelerivetClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> telerivet::Result<()> {
//!     let client = TelerivetClient::new(Auth::api_key("...")?)?;
//!     let project = client.init_project_by_id("PJ...");
//!
//!     let mut options = Params::new();
//!     options.insert("content".to_owned(), json!("hello"));
//!     options.insert("to_number".to_owned(), json!("+16505550123"));
//!     let message = project.send_message(options).await?;
//!     println!("{message}");
//!
//!     let mut contacts = project.query_contacts(Params::new())?.limit(50);
//!     while let Some(mut contact) = contacts.next().await? {
//!         contact.set_var("greeted", true)?;
//!         contact.save().await?;
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod cursor;
pub mod domain;
pub mod entity;
pub mod resources;
mod transport;

pub use client::{Auth, ErrorKind, TelerivetClient, TelerivetClientBuilder, TelerivetError};
pub use cursor::{ApiCursor, CursorState, MAX_PAGE_SIZE};
pub use domain::{ApiKey, ApiUrl, Params, ValidationError};
pub use entity::{Entity, FromRecord, Record};
pub use reqwest::Method;
pub use resources::*;

/// Result type used throughout the crate.
///
/// This is equivalent to `std::result::Result<T, TelerivetError>`.
pub type Result<T> = std::result::Result<T, TelerivetError>;
