//! Session-authenticated controller client that forces wireless clients to reassociate.
//!
//! The workflow is login, one `kick-sta` command per target, summary, logout:
//!
//! ```ignore
//! use stakick::{Credentials, HttpTransport, TargetId, workflow};
//!
//! let transport = HttpTransport::configure(url, true)?;
//! let targets = TargetId::parse_list("aa:bb:cc:dd:ee:01,aa:bb:cc:dd:ee:02");
//! let report = workflow::run(transport, &Credentials::new("admin", "pw"), "default", &targets, |_, _| {}).await?;
//! println!("{} of {} succeeded", report.summary.successful, report.summary.total);
//! ```
//!
//! Targets are processed strictly in order. A failing target never stops the
//! batch, and neither does a failed login.

pub mod error;
pub mod executor;
pub mod fake_transport;
pub mod session;
pub mod summary;
pub mod target;
pub mod transport;
pub mod workflow;

pub use error::{ConfigError, Error, Result, SessionError, TransportError};
pub use executor::{BatchExecutor, Outcome};
pub use session::{Credentials, Session, SessionManager, SessionState};
pub use summary::{Summary, summarize};
pub use target::TargetId;
pub use transport::{HttpTransport, Response, Transport, TransportConfig};
pub use workflow::WorkflowReport;

pub use stakick_protocol as protocol;
