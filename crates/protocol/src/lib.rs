//! Request bodies, response envelope and endpoint paths for the controller API.
//!
//! Only three calls are modelled: `POST /api/login`, `POST /api/s/{site}/cmd/stamgr`
//! with a `kick-sta` command, and `POST /api/auth/logout`. Responses follow the
//! controller's `{"meta": {"rc", "msg"}, "data": [...]}` envelope; anything else
//! is left as raw JSON for the caller. The HTTP client and session cookie are in
//! `stakick-core`.

pub mod endpoints;
pub mod envelope;
pub mod requests;

pub use endpoints::*;
pub use envelope::*;
pub use requests::*;
