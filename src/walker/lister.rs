//! Tree Lister
//!
//! One directory-listing request per call, with normalization: the self
//! and parent pseudo-entries are filtered out and protocol-layer entry
//! order is preserved. Failures map to [`ListError`] so that a bad path
//! never aborts the walk that requested it.

use crate::error::ListError;
use crate::smb::types::DirectoryEntry;
use crate::smb::TreeHandle;

/// Issue exactly one listing call for a relative path within the tree
///
/// A single leading separator is stripped before the request goes out;
/// queue entries carry it, the wire format does not.
pub fn list_tree(
    tree: &mut dyn TreeHandle,
    path: &str,
) -> Result<Vec<DirectoryEntry>, ListError> {
    let request = path.strip_prefix('\\').unwrap_or(path);

    let entries = tree.list(request).map_err(|e| ListError {
        path: path.to_string(),
        reason: e.to_string(),
    })?;

    Ok(entries.into_iter().filter(|e| !e.is_special()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SmbError, SmbResult};
    use crate::smb::types::PermissionFlags;
    use chrono::{TimeZone, Utc};

    struct ScriptedTree {
        requests: Vec<String>,
        response: SmbResult<Vec<DirectoryEntry>>,
    }

    impl TreeHandle for ScriptedTree {
        fn permissions(&self) -> PermissionFlags {
            PermissionFlags::read_only()
        }

        fn list(&mut self, path: &str) -> SmbResult<Vec<DirectoryEntry>> {
            self.requests.push(path.to_string());
            self.response.clone()
        }
    }

    fn entry(name: &str, is_directory: bool) -> DirectoryEntry {
        let stamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        DirectoryEntry {
            name: name.into(),
            created: stamp,
            accessed: stamp,
            written: stamp,
            changed: stamp,
            is_directory,
            size: if is_directory { None } else { Some(64) },
        }
    }

    #[test]
    fn test_filters_pseudo_entries_preserving_order() {
        let mut tree = ScriptedTree {
            requests: Vec::new(),
            response: Ok(vec![
                entry(".", true),
                entry("..", true),
                entry("notes.txt", false),
                entry("logs", true),
            ]),
        };

        let entries = list_tree(&mut tree, "").unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["notes.txt", "logs"]);
    }

    #[test]
    fn test_strips_one_leading_separator() {
        let mut tree = ScriptedTree {
            requests: Vec::new(),
            response: Ok(Vec::new()),
        };

        list_tree(&mut tree, r"\Users\bob").unwrap();
        list_tree(&mut tree, "Users").unwrap();
        assert_eq!(tree.requests, [r"Users\bob", "Users"]);
    }

    #[test]
    fn test_failure_maps_to_list_error() {
        let mut tree = ScriptedTree {
            requests: Vec::new(),
            response: Err(SmbError::UnexpectedStatus {
                status: "STATUS_ACCESS_DENIED".into(),
            }),
        };

        let err = list_tree(&mut tree, r"\secret").unwrap_err();
        assert_eq!(err.path, r"\secret");
        assert!(err.reason.contains("STATUS_ACCESS_DENIED"));
    }
}
