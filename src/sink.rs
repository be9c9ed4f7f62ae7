//! Spidered-result accumulation and hand-off
//!
//! One [`HostLoot`] per host collects [`FileRecord`]s in emission order
//! and, once that host's spidering completes, renders them into the
//! representation selected by [`LogFormat`] and hands the payload to the
//! external [`PersistenceSink`]. The hand-off happens at most once per
//! host and only when at least one record was produced.

use crate::error::SinkError;
use crate::policy::LogFormat;
use crate::smb::types::{DirectoryEntry, Share};
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;

/// Loot kind tag used for persistence hand-off
pub const LOOT_KIND: &str = "smb.enumshares";

/// Longest name rendered as-is in interactive listings
const DISPLAY_NAME_MAX: usize = 35;

/// Detailed-table column headers, in the original report order
const DETAIL_COLUMNS: [&str; 10] = [
    "IP Address",
    "Type",
    "Share",
    "Path",
    "Name",
    "Created",
    "Accessed",
    "Written",
    "Changed",
    "Size",
];

/// What a file record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

impl EntryKind {
    /// Record marker as stored and displayed
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Directory => "DIR",
            EntryKind::File => "FILE",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flattened metadata record for one discovered file or directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Target host
    pub host: String,

    /// Share the entry lives on (trimmed name)
    pub share: String,

    /// Relative parent path within the share ("" for the share root)
    pub path: String,

    /// Entry name, never truncated in the stored record
    pub name: String,

    /// Directory or file
    pub kind: EntryKind,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Last access timestamp
    pub accessed: DateTime<Utc>,

    /// Last write timestamp
    pub written: DateTime<Utc>,

    /// Last attribute change timestamp
    pub changed: DateTime<Utc>,

    /// Size in bytes; directories carry no size
    pub size: Option<u64>,
}

impl FileRecord {
    /// Build a record from one listed directory entry
    pub fn from_entry(host: &str, share: &str, parent_path: &str, entry: &DirectoryEntry) -> Self {
        let (kind, size) = if entry.is_directory {
            (EntryKind::Directory, None)
        } else {
            (EntryKind::File, entry.size)
        };

        Self {
            host: host.to_string(),
            share: share.to_string(),
            path: parent_path.to_string(),
            name: entry.name.clone(),
            kind,
            created: entry.created,
            accessed: entry.accessed,
            written: entry.written,
            changed: entry.changed,
            size,
        }
    }

    /// Name shortened for interactive display only
    pub fn display_name(&self) -> String {
        display_name(&self.name)
    }

    /// Flat one-line representation: `{host}\{share}{path}\{name}`
    pub fn flat_line(&self) -> String {
        format!("{}\\{}{}\\{}", self.host, self.share, self.path, self.name)
    }
}

/// Shorten a name for interactive rendering; stored records keep the
/// full name.
pub(crate) fn display_name(name: &str) -> String {
    if name.chars().count() > DISPLAY_NAME_MAX {
        let cut: String = name.chars().take(DISPLAY_NAME_MAX).collect();
        format!("{cut}...")
    } else {
        name.to_string()
    }
}

fn format_stamp(stamp: &DateTime<Utc>) -> String {
    stamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn format_size(size: Option<u64>) -> String {
    size.map(|s| s.to_string()).unwrap_or_default()
}

/// Per-host accumulator for spidered file records
#[derive(Debug, Clone)]
pub struct HostLoot {
    host: String,
    records: Vec<FileRecord>,
}

impl HostLoot {
    /// Create an empty accumulator for one host
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            records: Vec::new(),
        }
    }

    /// Append a record, preserving emission order
    pub fn push(&mut self, record: FileRecord) {
        self.records.push(record);
    }

    /// Append a batch of records
    pub fn extend(&mut self, records: impl IntoIterator<Item = FileRecord>) {
        self.records.extend(records);
    }

    /// Accumulated records in emission order
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Render the detailed records as CSV
    pub fn to_csv(&self) -> Result<String, SinkError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(DETAIL_COLUMNS)?;
        for record in &self.records {
            writer.write_record(&self.detail_row(record))?;
        }
        let bytes = writer.into_inner().map_err(|e| SinkError::Io(e.into_error()))?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Render the detailed records as a fixed-width text table
    pub fn to_table(&self) -> String {
        let rows: Vec<Vec<String>> = self.records.iter().map(|r| self.detail_row(r)).collect();

        let mut widths: Vec<usize> = DETAIL_COLUMNS.iter().map(|c| c.len()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        let mut out = format!("Spidered results for {}.\n", self.host);
        let header: Vec<String> = DETAIL_COLUMNS
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect();
        out.push_str(&format!(" {}\n", header.join("  ")));
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&format!(" {}\n", rule.join("  ")));
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

    /// Render one flat text line per record
    pub fn to_flat_text(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&record.flat_line());
            out.push('\n');
        }
        out
    }

    /// Hand the selected representation to the persistence sink
    ///
    /// No-op when the format is disabled or no records were accumulated.
    /// Returns the storage location reported by the sink.
    pub fn hand_off(
        &self,
        sink: &dyn PersistenceSink,
        format: LogFormat,
    ) -> Result<Option<String>, SinkError> {
        if self.records.is_empty() {
            return Ok(None);
        }

        let (mime, payload) = match format {
            LogFormat::Disabled => return Ok(None),
            LogFormat::Csv => ("text/csv", self.to_csv()?),
            LogFormat::Table => ("text/plain", self.to_table()),
            LogFormat::OneLine => ("text/plain", self.to_flat_text()),
        };

        let location = sink.store(LOOT_KIND, mime, &self.host, &payload)?;
        info!(host = %self.host, location = %location, "Spider results saved");
        Ok(Some(location))
    }

    fn detail_row(&self, record: &FileRecord) -> Vec<String> {
        vec![
            record.host.clone(),
            record.kind.as_str().to_string(),
            record.share.clone(),
            format!("{}\\", record.path),
            record.name.clone(),
            format_stamp(&record.created),
            format_stamp(&record.accessed),
            format_stamp(&record.written),
            format_stamp(&record.changed),
            format_size(record.size),
        ]
    }
}

/// External persistence collaborator
///
/// Fire-and-forget from the engine's perspective: storage failures are
/// reported to the caller but never abort enumeration.
pub trait PersistenceSink: Sync {
    /// Store one loot payload for a host, returning its location
    fn store(&self, kind: &str, mime: &str, host: &str, payload: &str)
        -> Result<String, SinkError>;

    /// Record the share list discovered on a host/port
    fn report_shares(&self, host: &str, port: u16, shares: &[Share]);

    /// Record service information (OS fingerprint) for a host/port
    fn report_service(&self, host: &str, port: u16, info: &str);
}

/// One payload captured by [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLoot {
    pub kind: String,
    pub mime: String,
    pub host: String,
    pub payload: String,
}

/// In-memory sink, useful for tests and dry runs
#[derive(Debug, Default)]
pub struct MemorySink {
    inner: Mutex<MemorySinkState>,
}

#[derive(Debug, Default)]
struct MemorySinkState {
    stored: Vec<StoredLoot>,
    share_reports: Vec<(String, u16, Vec<Share>)>,
    service_reports: Vec<(String, u16, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads stored so far
    pub fn stored(&self) -> Vec<StoredLoot> {
        self.inner.lock().expect("sink poisoned").stored.clone()
    }

    /// Share reports received so far
    pub fn share_reports(&self) -> Vec<(String, u16, Vec<Share>)> {
        self.inner.lock().expect("sink poisoned").share_reports.clone()
    }

    /// Service reports received so far
    pub fn service_reports(&self) -> Vec<(String, u16, String)> {
        self.inner.lock().expect("sink poisoned").service_reports.clone()
    }
}

impl PersistenceSink for MemorySink {
    fn store(
        &self,
        kind: &str,
        mime: &str,
        host: &str,
        payload: &str,
    ) -> Result<String, SinkError> {
        let mut state = self.inner.lock().expect("sink poisoned");
        state.stored.push(StoredLoot {
            kind: kind.to_string(),
            mime: mime.to_string(),
            host: host.to_string(),
            payload: payload.to_string(),
        });
        Ok(format!("memory://{host}/{kind}"))
    }

    fn report_shares(&self, host: &str, port: u16, shares: &[Share]) {
        let mut state = self.inner.lock().expect("sink poisoned");
        state
            .share_reports
            .push((host.to_string(), port, shares.to_vec()));
    }

    fn report_service(&self, host: &str, port: u16, info: &str) {
        let mut state = self.inner.lock().expect("sink poisoned");
        state
            .service_reports
            .push((host.to_string(), port, info.to_string()));
    }
}

/// Filesystem-backed sink writing one loot file per host
#[derive(Debug, Clone)]
pub struct FsLootStore {
    root: PathBuf,
}

impl FsLootStore {
    /// Create a store rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PersistenceSink for FsLootStore {
    fn store(
        &self,
        kind: &str,
        mime: &str,
        host: &str,
        payload: &str,
    ) -> Result<String, SinkError> {
        let ext = if mime == "text/csv" { "csv" } else { "txt" };
        std::fs::create_dir_all(&self.root)?;
        let path = self
            .root
            .join(format!("{}_{}.{}", host, kind.replace('.', "_"), ext));
        std::fs::write(&path, payload)?;
        Ok(path.display().to_string())
    }

    fn report_shares(&self, host: &str, port: u16, shares: &[Share]) {
        info!(host, port, count = shares.len(), "Shares reported");
    }

    fn report_service(&self, host: &str, port: u16, info: &str) {
        info!(host, port, info, "Service reported");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smb::types::ShareType;
    use chrono::TimeZone;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn record(name: &str, kind: EntryKind, size: Option<u64>) -> FileRecord {
        FileRecord {
            host: "10.0.0.5".into(),
            share: "C$".into(),
            path: "\\logs".into(),
            name: name.into(),
            kind,
            created: stamp(),
            accessed: stamp(),
            written: stamp(),
            changed: stamp(),
            size,
        }
    }

    #[test]
    fn test_display_name_truncation() {
        let short = record("notes.txt", EntryKind::File, Some(10));
        assert_eq!(short.display_name(), "notes.txt");

        let long_name = "a".repeat(40);
        let long = record(&long_name, EntryKind::File, Some(10));
        assert_eq!(long.display_name(), format!("{}...", "a".repeat(35)));
        // The stored record keeps the full name.
        assert_eq!(long.name, long_name);
    }

    #[test]
    fn test_flat_line_format() {
        let rec = record("a.log", EntryKind::File, Some(3));
        assert_eq!(rec.flat_line(), "10.0.0.5\\C$\\logs\\a.log");
    }

    #[test]
    fn test_csv_rendering() {
        let mut loot = HostLoot::new("10.0.0.5");
        loot.push(record("a.log", EntryKind::File, Some(3)));
        loot.push(record("nested", EntryKind::Directory, None));

        let csv = loot.to_csv().unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "IP Address,Type,Share,Path,Name,Created,Accessed,Written,Changed,Size"
        );
        let first = lines.next().unwrap();
        assert!(first.starts_with("10.0.0.5,FILE,C$,\\logs\\,a.log,"));
        assert!(first.ends_with(",3"));
        let second = lines.next().unwrap();
        assert!(second.starts_with("10.0.0.5,DIR,C$,\\logs\\,nested,"));
        // Directories carry no size.
        assert!(second.ends_with(","));
    }

    #[test]
    fn test_table_rendering() {
        let mut loot = HostLoot::new("10.0.0.5");
        loot.push(record("a.log", EntryKind::File, Some(3)));

        let table = loot.to_table();
        assert!(table.starts_with("Spidered results for 10.0.0.5."));
        assert!(table.contains("IP Address"));
        assert!(table.contains("a.log"));
    }

    #[test]
    fn test_hand_off_empty_is_noop() {
        let sink = MemorySink::new();
        let loot = HostLoot::new("10.0.0.5");

        let location = loot.hand_off(&sink, LogFormat::OneLine).unwrap();
        assert!(location.is_none());
        assert!(sink.stored().is_empty());
    }

    #[test]
    fn test_hand_off_disabled_is_noop() {
        let sink = MemorySink::new();
        let mut loot = HostLoot::new("10.0.0.5");
        loot.push(record("a.log", EntryKind::File, Some(3)));

        let location = loot.hand_off(&sink, LogFormat::Disabled).unwrap();
        assert!(location.is_none());
        assert!(sink.stored().is_empty());
    }

    #[test]
    fn test_hand_off_formats() {
        let mut loot = HostLoot::new("10.0.0.5");
        loot.push(record("a.log", EntryKind::File, Some(3)));

        let sink = MemorySink::new();
        loot.hand_off(&sink, LogFormat::Csv).unwrap().unwrap();
        loot.hand_off(&sink, LogFormat::Table).unwrap().unwrap();
        loot.hand_off(&sink, LogFormat::OneLine).unwrap().unwrap();

        let stored = sink.stored();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0].mime, "text/csv");
        assert_eq!(stored[1].mime, "text/plain");
        assert_eq!(stored[2].mime, "text/plain");
        assert!(stored[2].payload.ends_with("\\a.log\n"));
        assert!(stored.iter().all(|l| l.kind == LOOT_KIND));
    }

    #[test]
    fn test_memory_sink_reports() {
        let sink = MemorySink::new();
        let shares = vec![Share::new("C$", ShareType::Disk, "Default share")];
        sink.report_shares("10.0.0.5", 445, &shares);
        sink.report_service("10.0.0.5", 445, "Windows 10 SP1 (English)");

        assert_eq!(sink.share_reports().len(), 1);
        assert_eq!(sink.share_reports()[0].1, 445);
        assert_eq!(sink.service_reports()[0].2, "Windows 10 SP1 (English)");
    }

    #[test]
    fn test_fs_loot_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsLootStore::new(dir.path());

        let mut loot = HostLoot::new("10.0.0.5");
        loot.push(record("a.log", EntryKind::File, Some(3)));
        let location = loot.hand_off(&store, LogFormat::Csv).unwrap().unwrap();

        assert!(location.ends_with("10.0.0.5_smb_enumshares.csv"));
        let contents = std::fs::read_to_string(&location).unwrap();
        assert!(contents.contains("a.log"));
    }
}
