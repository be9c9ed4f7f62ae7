//! Profile Resolver
//!
//! For OS-default drive-letter shares under a profile-restricted policy,
//! finds the user-profile subdirectories to seed the spider with. The
//! modern convention (`Users`) is probed first; when it yields nothing,
//! the legacy convention (`Documents and Settings`) is tried.

use crate::smb::types::Share;
use crate::smb::TreeHandle;
use crate::walker::lister::list_tree;
use crate::walker::queue::PendingPath;
use tracing::debug;

/// Resolve the user-profile seed paths for one share
///
/// Returns one pending path per top-level entry under whichever
/// convention produced candidates; empty when neither did.
pub fn resolve_profile_dirs(tree: &mut dyn TreeHandle, share: &Share) -> Vec<PendingPath> {
    let mut dirs = user_dirs(tree, share, "Users");
    if dirs.is_empty() {
        dirs = user_dirs(tree, share, "Documents and Settings");
    }
    dirs
}

/// List the candidate user directories under one convention base
///
/// An unreadable tree or a failed listing yields no candidates; the
/// caller falls back or seeds nothing.
fn user_dirs(tree: &mut dyn TreeHandle, share: &Share, base: &str) -> Vec<PendingPath> {
    if !tree.permissions().can_read {
        return Vec::new();
    }

    let entries = match list_tree(tree, base) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(share = share.trimmed_name(), %err, "Profile probe failed");
            return Vec::new();
        }
    };

    entries
        .iter()
        .map(|e| PendingPath::new(share.trimmed_name(), format!("\\{}\\{}", base, e.name)))
        .collect()
}
