//! Enumeration engine
//!
//! Everything between "a transport exists" and "records reached the
//! sink" lives here. [`coordinator`] fans hosts out to workers, the
//! [`orchestrator`] runs one host end to end across its candidate
//! ports, and [`spider`] walks the shares a session surfaced, leaning
//! on [`classify`], [`queue`], [`lister`] and [`profiles`] for the
//! skip rules, traversal order, listing normalization and profile
//! seeding.

pub mod classify;
pub mod coordinator;
pub mod lister;
pub mod orchestrator;
pub mod profiles;
pub mod queue;
pub mod spider;

pub use coordinator::{ScanCoordinator, MAX_WORKERS};
pub use orchestrator::{HostEnumerator, HostSummary};
pub use spider::spider_host_shares;
