//! Blocking client for the organisation accounts REST resource.
//!
//! # Overview
//! `AccountClient` exposes `create`, `fetch` and `delete` against a
//! configurable base URL. Each call builds an `HttpRequest`, runs it through a
//! `Transport` (a fresh `ureq` agent by default) and interprets the
//! `HttpResponse` into an `AccountResponse` envelope or an `ApiError`.
//!
//! # Design
//! - `AccountClient` is stateless: it holds only `base_url` and its transport,
//!   so one client can be shared across threads.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit and the status
//!   mapping is testable without a server.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//!
//! ```no_run
//! use account_core::{Account, AccountClient};
//!
//! # fn main() -> Result<(), account_core::ApiError> {
//! let client = AccountClient::new("http://localhost:8080")?;
//! let id = "eb0bd6f5-c3f5-44b2-b677-bcd23cdde73c";
//! let account = Account::basic(id, id, "GB", "123456", "GBDSC", "EXMPLGB2XXX", ["Jane Doe"]);
//! client.create(&account)?;
//! let fetched = client.fetch(id)?;
//! if let Some(version) = fetched.data.and_then(|data| data.version) {
//!     client.delete(id, version)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::AccountClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{BoxError, Transport, UreqTransport};
pub use types::{Account, AccountAttributes, AccountResponse, ResponseLinks, ACCOUNT_TYPE};
