//! Protocol collaborator interfaces
//!
//! The engine never speaks SMB itself. It drives an externally supplied
//! transport through the traits below: one [`Session`] per host attempt,
//! one [`TreeHandle`] per connected share. A tree handle is never shared
//! across shares; it is dropped when that share's walk completes.

pub mod types;

use crate::error::SmbResult;
use types::{DirectoryEntry, OsInfo, PermissionFlags, Share};

/// Protocol dialect selector for connection negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SmbVersion {
    V1,
    V2,
    V3,
}

/// Legacy NetBIOS session port; negotiates SMB1 only
pub const SMB1_PORT: u16 = 139;

/// Modern direct-hosted port; negotiates SMB1 through SMB3
pub const SMB2_3_PORT: u16 = 445;

/// Candidate ports with their version sets, in priority order
pub fn port_candidates() -> [(u16, &'static [SmbVersion]); 2] {
    [
        (SMB1_PORT, &[SmbVersion::V1][..]),
        (
            SMB2_3_PORT,
            &[SmbVersion::V1, SmbVersion::V2, SmbVersion::V3][..],
        ),
    ]
}

/// Opens protocol sessions to remote hosts
///
/// Implementations are shared by reference across scan workers and must
/// therefore be `Sync`.
pub trait SessionTransport: Sync {
    /// Connect to a host on the given port, negotiating one of the
    /// supplied protocol versions.
    fn connect(&self, host: &str, port: u16, versions: &[SmbVersion])
        -> SmbResult<Box<dyn Session>>;
}

/// One negotiated protocol session
///
/// Owned by a single host attempt; `disconnect` must be called on every
/// exit path, success or failure.
pub trait Session {
    /// Perform session setup with the configured credentials
    fn authenticate(&mut self) -> SmbResult<()>;

    /// Enumerate all shares exposed by the target
    fn list_shares(&mut self) -> SmbResult<Vec<Share>>;

    /// Connect to one share, yielding a tree handle scoped to it
    fn open_tree(&mut self, host: &str, share_name: &str) -> SmbResult<Box<dyn TreeHandle>>;

    /// Best-effort OS fingerprint; absence is not an error
    fn fingerprint(&mut self) -> Option<OsInfo>;

    /// Release the session
    fn disconnect(&mut self);
}

/// A protocol connection scoped to one share
pub trait TreeHandle {
    /// Capability flags from the tree-connect response
    fn permissions(&self) -> PermissionFlags;

    /// Issue one directory-listing request for a relative path within
    /// the share ("" for the share root). Entry order is whatever the
    /// protocol layer returns.
    fn list(&mut self, path: &str) -> SmbResult<Vec<DirectoryEntry>>;
}
