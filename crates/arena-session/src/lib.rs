//! Session Lifecycle
//!
//! Holds simulation sessions for the `arena` binary and any embedding
//! caller: create a session around a brief, configure its population,
//! run it in the background, read the report, rerun for a fresh sample,
//! destroy it when done. A one-shot text analysis path skips the session
//! bookkeeping entirely.
//!
//! All state is in-process and lost on shutdown. The engine lives in
//! `arena-core`, report assembly in `arena-analyst`; this crate only
//! owns the lifecycle around them.

pub mod adhoc;
pub mod error;
pub mod session;
pub mod store;

// Re-export the lifecycle types
pub use adhoc::{ad_hoc_config, brief_from_text};
pub use error::{Result, SessionError};
pub use session::SimulationSession;
pub use store::SessionStore;
