//! # untis-rpc
//!
//! Session-authenticated JSON-RPC client for the Untis timetabling service.
//!
//! Layers, leaves first:
//! - [`HttpTransport`]: envelope over HTTPS POST, `JSESSIONID` cookie,
//!   per-session correlation counter
//! - [`Session`]: `unauthenticated → authenticated → closed`
//! - reference resolution (teachers, rooms, classes, subjects) with a
//!   per-session listing cache
//! - timetable retrieval into [`untis_core::Lesson`] values
//! - [`ClientRegistry`]: username → shared session handle
//!
//! Every network operation takes a [`CallContext`] carrying an optional
//! deadline and a cancellation token.

mod context;
mod error;
mod reference;
mod registry;
mod session;
mod timetable;
mod transport;
mod wire;

pub use context::{CallContext, CancelToken};
pub use error::RpcError;
pub use reference::ResolvedNames;
pub use registry::{ClientRegistry, SharedSession};
pub use session::Session;
pub use transport::HttpTransport;
