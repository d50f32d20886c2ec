//! # keyprobe shared model
//!
//! Types shared by the engine and the command line front-end:
//!
//! * [`network`]: targets, host addresses and the deduplicated [`network::catalog::TargetCatalog`].
//! * [`credentials`]: the ordered username/password matrix.
//! * [`loader`]: newline-delimited list files.
//! * [`config`]: run configuration and its validation errors.
//! * [`log`]: status-aware logging macros on top of `tracing`.

pub mod config;
pub mod credentials;
pub mod loader;
pub mod log;
pub mod network;

#[doc(hidden)]
pub use tracing as __tracing;
