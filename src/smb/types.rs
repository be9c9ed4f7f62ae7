//! SMB entry types and data structures
//!
//! Concrete, tagged structures produced once at the protocol boundary.
//! Downstream code never re-interprets loosely-typed response objects;
//! everything it needs lives in these types.

use chrono::{DateTime, Utc};
use std::fmt;

/// Share type tag as reported by the share enumeration service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShareType {
    /// Disk volume
    Disk,
    /// Temporary share
    Temporary,
    /// Print queue
    Printer,
    /// Inter-process communication endpoint
    Ipc,
    /// Communications device
    Device,
    /// Special/administrative share
    Special,
    /// Anything the protocol layer could not map
    Unknown,
}

impl ShareType {
    /// Map a raw wire tag to a share type; unrecognized tags are Unknown
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "DISK" => ShareType::Disk,
            "TEMPORARY" => ShareType::Temporary,
            "PRINTER" => ShareType::Printer,
            "IPC" => ShareType::Ipc,
            "DEVICE" => ShareType::Device,
            "SPECIAL" => ShareType::Special,
            _ => ShareType::Unknown,
        }
    }

    /// Wire tag for this type
    pub fn as_tag(&self) -> &'static str {
        match self {
            ShareType::Disk => "DISK",
            ShareType::Temporary => "TEMPORARY",
            ShareType::Printer => "PRINTER",
            ShareType::Ipc => "IPC",
            ShareType::Device => "DEVICE",
            ShareType::Special => "SPECIAL",
            ShareType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ShareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// A named, typed resource exposed by the file-serving endpoint
///
/// Immutable once received from the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    /// Share name as reported (may carry trailing padding)
    pub name: String,

    /// Share type tag
    pub share_type: ShareType,

    /// Free-text comment from the server
    pub comment: String,
}

impl Share {
    /// Create a share record
    pub fn new(name: impl Into<String>, share_type: ShareType, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            share_type,
            comment: comment.into(),
        }
    }

    /// Share name with surrounding whitespace removed
    ///
    /// Servers pad share names; all comparisons use the trimmed form.
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }
}

/// Read/write capability flags for a connected tree
///
/// Built once from the two independent extended-attribute capability bits
/// on the tree-connect response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionFlags {
    /// Tree contents can be listed/read
    pub can_read: bool,

    /// Tree contents can be written
    pub can_write: bool,
}

impl PermissionFlags {
    /// Interpret the raw capability bits from a tree-connect response
    pub fn from_ea_bits(read_ea: u32, write_ea: u32) -> Self {
        Self {
            can_read: read_ea == 1,
            can_write: write_ea == 1,
        }
    }

    /// Both read and write
    pub fn read_write() -> Self {
        Self {
            can_read: true,
            can_write: true,
        }
    }

    /// Read only
    pub fn read_only() -> Self {
        Self {
            can_read: true,
            can_write: false,
        }
    }
}

/// A directory entry returned from one listing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Entry name (not full path)
    pub name: String,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Last access timestamp
    pub accessed: DateTime<Utc>,

    /// Last write timestamp
    pub written: DateTime<Utc>,

    /// Last attribute change timestamp
    pub changed: DateTime<Utc>,

    /// Entry is a directory
    pub is_directory: bool,

    /// Size in bytes; directories carry no size
    pub size: Option<u64>,
}

impl DirectoryEntry {
    /// Check if this is the self or parent pseudo-entry (. or ..)
    pub fn is_special(&self) -> bool {
        self.name == "." || self.name == ".."
    }
}

/// Best-effort OS fingerprint for the remote host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsInfo {
    /// Operating system name ("Unknown" when fingerprinting failed)
    pub os: String,

    /// Service pack level
    pub service_pack: String,

    /// Language
    pub lang: String,
}

impl OsInfo {
    /// Human-readable summary, None when the OS could not be identified
    pub fn summary(&self) -> Option<String> {
        if self.os == "Unknown" {
            return None;
        }
        Some(format!("{} {} ({})", self.os, self.service_pack, self.lang))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_share_type_from_tag() {
        assert_eq!(ShareType::from_tag("DISK"), ShareType::Disk);
        assert_eq!(ShareType::from_tag("disk"), ShareType::Disk);
        assert_eq!(ShareType::from_tag(" IPC "), ShareType::Ipc);
        assert_eq!(ShareType::from_tag("CLUSTER"), ShareType::Unknown);
        assert_eq!(ShareType::from_tag(""), ShareType::Unknown);
    }

    #[test]
    fn test_share_trimmed_name() {
        let share = Share::new("C$   ", ShareType::Disk, "Default share");
        assert_eq!(share.trimmed_name(), "C$");
    }

    #[test]
    fn test_permission_bits() {
        let rw = PermissionFlags::from_ea_bits(1, 1);
        assert!(rw.can_read);
        assert!(rw.can_write);

        let ro = PermissionFlags::from_ea_bits(1, 0);
        assert!(ro.can_read);
        assert!(!ro.can_write);

        // Any value other than 1 means the capability is absent.
        let none = PermissionFlags::from_ea_bits(0, 2);
        assert!(!none.can_read);
        assert!(!none.can_write);
    }

    #[test]
    fn test_directory_entry_special() {
        let mut entry = DirectoryEntry {
            name: ".".into(),
            created: stamp(),
            accessed: stamp(),
            written: stamp(),
            changed: stamp(),
            is_directory: true,
            size: None,
        };
        assert!(entry.is_special());

        entry.name = "..".into();
        assert!(entry.is_special());

        entry.name = "...three-dots".into();
        assert!(!entry.is_special());
    }

    #[test]
    fn test_os_info_summary() {
        let known = OsInfo {
            os: "Windows 10".into(),
            service_pack: "SP1".into(),
            lang: "English".into(),
        };
        assert_eq!(known.summary().unwrap(), "Windows 10 SP1 (English)");

        let unknown = OsInfo {
            os: "Unknown".into(),
            service_pack: String::new(),
            lang: String::new(),
        };
        assert!(unknown.summary().is_none());
    }
}
