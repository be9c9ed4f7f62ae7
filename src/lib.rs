//! smb-walker - SMB Share Discovery and Spidering Engine
//!
//! Given an authenticated session to a remote host, this crate discovers
//! all exposed SMB shares, classifies their type and accessibility, and
//! (optionally) performs a depth-bounded recursive walk of their directory
//! trees, collecting per-file metadata along the way.
//!
//! The protocol transport, authentication handshake, credential handling
//! and persistent loot storage are external collaborators reached through
//! the traits in [`smb`] and [`sink`]. This crate owns the enumeration
//! logic only.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    ScanCoordinator                       │
//! │        (worker pool, one host per task, crossbeam)       │
//! └────────────────────────────┬────────────────────────────┘
//!                              │ per host, strictly sequential
//!                              ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                    HostEnumerator                        │
//! │   port 139 [SMB1] → port 445 [SMB1/2/3], retry-once      │
//! │   connect → authenticate → list shares → fingerprint     │
//! └────────────────────────────┬────────────────────────────┘
//!                              │ per enumerable share
//!                              ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                     Spider Engine                        │
//! │   FIFO queue of pending paths → Tree Lister → records    │
//! │   (profile restriction, depth bound, skip lists)         │
//! └────────────────────────────┬────────────────────────────┘
//!                              │ once per host, if non-empty
//!                              ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │              HostLoot → PersistenceSink                  │
//! │            (CSV / table / one-line formats)              │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod policy;
pub mod sink;
pub mod smb;
pub mod walker;

pub use error::{ConfigError, ListError, Result, SinkError, SmbError, SmbResult, SpiderError};
pub use policy::{EnumerationPolicy, LogFormat};
pub use sink::{EntryKind, FileRecord, FsLootStore, HostLoot, MemorySink, PersistenceSink};
pub use smb::types::{DirectoryEntry, OsInfo, PermissionFlags, Share, ShareType};
pub use smb::{Session, SessionTransport, SmbVersion, TreeHandle};
pub use walker::coordinator::ScanCoordinator;
pub use walker::orchestrator::{HostEnumerator, HostSummary};
