//! Share classification and skip rules
//!
//! Maps share-type tags onto enumeration classes and captures the fixed
//! name-based skip rules: administrative shares are never spidered, the
//! `Users` share only when profile spidering is enabled, and the
//! drive-letter default shares get the profile-restricted treatment.

use crate::smb::types::ShareType;

/// Enumeration class for a share type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareClass {
    /// Contents can be listed
    Enumerable,
    /// Known type with nothing to enumerate
    Skippable,
    /// Unrecognized device type; treated as skippable, reported distinctly
    Unknown,
}

/// Classify a share type
///
/// Pure function; exhaustive over the closed type enum so the Unknown
/// fallback is explicit.
pub fn classify(share_type: ShareType) -> ShareClass {
    match share_type {
        ShareType::Disk | ShareType::Temporary => ShareClass::Enumerable,
        ShareType::Printer | ShareType::Ipc | ShareType::Device | ShareType::Special => {
            ShareClass::Skippable
        }
        ShareType::Unknown => ShareClass::Unknown,
    }
}

/// Shares that are never spidered regardless of policy
pub const SKIPPABLE_SHARES: [&str; 2] = ["ADMIN$", "IPC$"];

/// Share holding user homes on Windows 7 and later
pub const USERS_SHARE: &str = "Users";

/// Modern user directory convention (Windows 7 & 10)
pub const USERS_DIR: &str = r"\Users";

/// Legacy user directory convention (Windows XP)
pub const DOCUMENTS_DIR: &str = r"\Documents and Settings";

/// Check whether a share is one of the OS-default drive-letter shares
/// (`C$` through `Z$`). These get the profile-restricted treatment when
/// the policy asks for it.
pub fn is_default_share(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(drive), Some('$'), None) if drive.is_ascii_uppercase() && drive >= 'C'
    )
}

/// Check whether a relative path is one of the recognized user-root
/// markers. These are skipped outright when profile spidering is off.
pub fn is_user_root(path: &str) -> bool {
    path == USERS_DIR || path == DOCUMENTS_DIR
}
