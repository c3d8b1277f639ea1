//! DHIS2 web API access.
//!
//! This crate provides the configuration, the authenticated REST client and
//! the JSON schemas of the endpoints consumed by the import pipeline.
//!
//! # Overview
//!
//! - [`ServerConfig`] loads `server`, `username` and `password` from a JSON
//!   file and rejects incomplete configurations before any request is made.
//! - [`Dhis2Client`] issues GET/POST/PUT/PATCH/DELETE requests with basic
//!   authentication and the global `paging=false&skipPaging=true` query.
//! - [`model`] holds the typed request and response bodies.
//!
//! # Example
//!
//! ```no_run
//! use dhis2_api::{Dhis2Client, ServerConfig};
//!
//! fn current_user() -> dhis2_api::Result<()> {
//!     let config = ServerConfig::from_path("config.json")?;
//!     let client = Dhis2Client::new(&config)?;
//!     let me = client.me()?;
//!     println!("member of {} org units", me.organisation_units.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
pub mod model;

pub use client::{ApiResponse, Dhis2Client, GLOBAL_QUERY, basic_authorization};
pub use config::ServerConfig;
pub use error::{ApiError, Result};

/// Metadata import endpoint.
pub const METADATA_ENDPOINT: &str = "api/metadata";

/// Current user endpoint (pinned API version).
pub const ME_ENDPOINT: &str = "api/27/me";

/// Organisation unit listing endpoint.
pub const ORGANISATION_UNITS_ENDPOINT: &str = "api/organisationUnits";

/// Data element listing endpoint.
pub const DATA_ELEMENTS_ENDPOINT: &str = "api/dataElements";

/// Data value set import endpoint.
pub const DATA_VALUE_SETS_ENDPOINT: &str = "api/dataValueSets";

/// Analytics resource table generation endpoint.
pub const ANALYTICS_ENDPOINT: &str = "api/resourceTables/analytics";
