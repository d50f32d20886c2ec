//! # keyprobe engine
//!
//! The concurrent credential-probing engine.
//!
//! * [`probe`]: the per-target executor. Checks reachability, then sweeps the
//!   credential matrix in trial order and stops at the first accepted pair.
//! * [`scanner`]: the coordinator. Runs a bounded pool of workers over the
//!   catalog and funnels every outcome through one synchronized ledger.
//! * [`report`]: reduces a finished scan into a deterministic report.
//! * [`network`]: the collaborator seams ([`network::Connector`],
//!   [`network::Authenticator`]) and the TCP reachability connector.
//! * [`discovery`]: the search-index seam used to grow a target catalog.

pub mod clock;
pub mod discovery;
pub mod network;
pub mod plan;
pub mod probe;
pub mod report;
pub mod scanner;
