//! Route planning session
//!
//! A session moves through four stages:
//!
//! ```text
//! NoData ──load──▶ DataLoaded ──generate──▶ Generating ──reply──▶ RoutesAvailable
//!                      ▲                        │                       │
//!                      └──────── failure ───────┘◀── new data / edit ───┘
//! ```
//!
//! An error overlay and the service reachability flag sit beside the stage.
//! [`SessionState`] is an immutable value updated by [`SessionState::apply`];
//! [`Session`] performs the I/O and feeds the outcomes back in as [`Action`]s.

pub mod error;
pub mod service;
pub mod session;
pub mod state;

pub use error::SessionError;
pub use service::RouteService;
pub use session::Session;
pub use state::{Action, GenerationId, ServiceStatus, SessionState, Stage};
