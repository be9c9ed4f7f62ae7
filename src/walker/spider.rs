//! Spider Engine
//!
//! Queue-driven, policy-bounded traversal of a share's directory tree.
//! Each share gets its own FIFO queue and its own tree handle; draining
//! the queue to completion before the next share begins keeps a host's
//! walk strictly sequential. Failures at one path discard that path
//! only; failures at one share skip that share only.

use crate::error::{SmbError, SmbResult};
use crate::policy::EnumerationPolicy;
use crate::sink::{display_name, FileRecord};
use crate::smb::types::{DirectoryEntry, Share};
use crate::smb::{Session, TreeHandle};
use crate::walker::classify::{
    classify, is_default_share, is_user_root, ShareClass, SKIPPABLE_SHARES, USERS_SHARE,
};
use crate::walker::lister::list_tree;
use crate::walker::profiles::resolve_profile_dirs;
use crate::walker::queue::{PendingPath, SpiderQueue};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Spider every eligible share of one host, in share-list order
///
/// Administrative shares, the `Users` share without profile spidering,
/// and non-enumerable share classes are discarded before any tree
/// connect. Returns the accumulated file records in emission order; the
/// only error this propagates is an interrupt.
pub fn spider_host_shares(
    session: &mut dyn Session,
    host: &str,
    shares: &[Share],
    policy: &EnumerationPolicy,
    shutdown: &AtomicBool,
) -> SmbResult<Vec<FileRecord>> {
    let mut records = Vec::new();

    for share in shares {
        if shutdown.load(Ordering::Relaxed) {
            return Err(SmbError::Interrupted);
        }

        let name = share.trimmed_name();

        if SKIPPABLE_SHARES.contains(&name)
            || (name == USERS_SHARE && !policy.spider_profiles)
        {
            info!(host, "Skipping {name}");
            continue;
        }

        match classify(share.share_type) {
            ShareClass::Enumerable => {}
            ShareClass::Skippable => {
                info!(
                    host,
                    "Skipping share {name} as it is of type {}", share.share_type
                );
                continue;
            }
            ShareClass::Unknown => {
                info!(
                    host,
                    "Skipping share {name}: unhandled device type ({})", share.share_type
                );
                continue;
            }
        }

        if !policy.show_files {
            info!(host, "Spidering {name}");
        }

        let mut tree = match session.open_tree(host, name) {
            Ok(tree) => tree,
            Err(e) => {
                warn!(host, "Error when trying to connect to share {name} - {e}");
                if !policy.show_files {
                    info!(host, "Spidering {name} complete");
                }
                continue;
            }
        };

        spider_share(tree.as_mut(), host, share, policy, shutdown, &mut records)?;
        // Tree handle is dropped here; it never outlives its share's walk.

        if !policy.show_files {
            info!(host, "Spidering {name} complete");
        }
    }

    Ok(records)
}

/// Walk one share's tree to completion, appending records in
/// discovery order
fn spider_share(
    tree: &mut dyn TreeHandle,
    host: &str,
    share: &Share,
    policy: &EnumerationPolicy,
    shutdown: &AtomicBool,
    records: &mut Vec<FileRecord>,
) -> SmbResult<()> {
    let name = share.trimmed_name();
    let default_share = is_default_share(name);

    // Seeding: profile candidates for OS-default shares under the
    // profile-restricted policy, otherwise the share root.
    let mut queue = SpiderQueue::new();
    if default_share && policy.spider_profiles {
        queue.extend(resolve_profile_dirs(tree, share));
    } else {
        queue.push(PendingPath::root(name));
    }

    // Draining: pop the head, apply skip/depth rules, list, re-enqueue.
    while let Some(pending) = queue.pop() {
        if shutdown.load(Ordering::Relaxed) {
            return Err(SmbError::Interrupted);
        }

        if is_user_root(&pending.path) && !policy.spider_profiles {
            continue;
        }

        let depth = pending.depth();
        // Profile-convention paths carry a fixed two-segment prefix, so
        // the effective depth under the bound is offset by two.
        if default_share
            && policy.spider_profiles
            && i64::from(depth) - 2 > i64::from(policy.max_depth)
        {
            continue;
        }

        let permissions = tree.permissions();
        let entries = match list_tree(tree, &pending.path) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(host, share = name, %err, "Discarding path");
                continue;
            }
        };

        if entries.is_empty() || !permissions.can_read {
            continue;
        }

        for entry in &entries {
            if entry.is_directory {
                queue.push(pending.child(&entry.name));
            }
            records.push(FileRecord::from_entry(host, name, &pending.path, entry));
        }

        if policy.show_files {
            info!(
                host,
                "\n{}",
                render_dir_listing(host, name, &pending.path, &entries)
            );
        }
    }

    Ok(())
}

/// Render one directory's listing as a small table for interactive
/// display. Names longer than the display limit are truncated here and
/// only here.
fn render_dir_listing(host: &str, share: &str, path: &str, entries: &[DirectoryEntry]) -> String {
    const COLUMNS: [&str; 7] = [
        "Type", "Name", "Created", "Accessed", "Written", "Changed", "Size",
    ];

    let rows: Vec<[String; 7]> = entries
        .iter()
        .map(|e| {
            [
                if e.is_directory { "DIR" } else { "FILE" }.to_string(),
                display_name(&e.name),
                e.created.format("%Y-%m-%d %H:%M:%S").to_string(),
                e.accessed.format("%Y-%m-%d %H:%M:%S").to_string(),
                e.written.format("%Y-%m-%d %H:%M:%S").to_string(),
                e.changed.format("%Y-%m-%d %H:%M:%S").to_string(),
                e.size.map(|s| s.to_string()).unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = COLUMNS.iter().map(|c| c.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = format!("\\\\{host}\\{share}{path}\n");
    let header: Vec<String> = COLUMNS
        .iter()
        .zip(&widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect();
    out.push_str(&format!(" {}\n", header.join("  ")));
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect();
        out.push_str(&format!(" {}\n", cells.join("  ")));
    }
    out
}
