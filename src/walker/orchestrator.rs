//! Per-host enumeration orchestrator
//!
//! Runs one host end to end: walk the candidate ports in priority
//! order, and on the first session that surfaces shares, report them,
//! optionally spider them, and hand the accumulated loot to the sink.
//! Port-level failures fall through to the next candidate port; a
//! transient resource failure earns the same port one delayed retry
//! first. Only a runtime failure abandons the host, and only an
//! interrupt escapes this module as an error.

use crate::error::{Result, SmbError, SmbResult, SpiderError};
use crate::policy::EnumerationPolicy;
use crate::sink::{HostLoot, PersistenceSink};
use crate::smb::types::{OsInfo, Share};
use crate::smb::{port_candidates, Session, SessionTransport, SmbVersion};
use crate::walker::spider::spider_host_shares;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Delay before the single retry of a transient resource failure
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Outcome of one host's enumeration
#[derive(Debug, Clone)]
pub struct HostSummary {
    /// Target host
    pub host: String,

    /// Port the successful session ran on, None when no port worked
    pub port: Option<u16>,

    /// Shares discovered on the host
    pub shares: Vec<Share>,

    /// OS fingerprint, when the session produced one
    pub os_info: Option<OsInfo>,

    /// Number of file records the spider emitted
    pub record_count: usize,

    /// Where the loot payload was stored, when a hand-off happened
    pub loot_location: Option<String>,

    /// Runtime failure that abandoned the host, when one occurred
    pub fatal_error: Option<String>,
}

impl HostSummary {
    fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            port: None,
            shares: Vec::new(),
            os_info: None,
            record_count: 0,
            loot_location: None,
            fatal_error: None,
        }
    }
}

/// Drives the full enumeration of single hosts
pub struct HostEnumerator<'a> {
    transport: &'a dyn SessionTransport,
    sink: &'a dyn PersistenceSink,
    policy: EnumerationPolicy,
    shutdown: Arc<AtomicBool>,
    retry_delay: Duration,
}

impl<'a> HostEnumerator<'a> {
    pub fn new(
        transport: &'a dyn SessionTransport,
        sink: &'a dyn PersistenceSink,
        policy: EnumerationPolicy,
    ) -> Self {
        Self {
            transport,
            sink,
            policy,
            shutdown: Arc::new(AtomicBool::new(false)),
            retry_delay: RETRY_DELAY,
        }
    }

    /// Share a shutdown flag with the caller; setting it stops the
    /// enumeration at the next checkpoint.
    pub fn with_shutdown(mut self, shutdown: Arc<AtomicBool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Override the transient-failure retry delay
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Enumerate one host across its candidate ports
    ///
    /// All failures are absorbed into the summary except an interrupt,
    /// which is always propagated.
    pub fn run_host(&self, host: &str) -> Result<HostSummary> {
        let mut summary = HostSummary::new(host);

        for (port, versions) in port_candidates() {
            if self.shutdown.load(Ordering::Relaxed) {
                return Err(SpiderError::Interrupted);
            }

            match self.attempt_port_with_retry(host, port, versions, &mut summary) {
                Ok(shares) if !shares.is_empty() => break,
                Ok(_) => {
                    info!(host, port, "No shares enumerated");
                }
                Err(SmbError::Interrupted) => return Err(SpiderError::Interrupted),
                Err(e) if e.is_fatal_for_host() => {
                    error!(host, port, "Error: {e}");
                    summary.fatal_error = Some(e.to_string());
                    break;
                }
                Err(e) => {
                    warn!(host, port, "Port attempt failed: {e}");
                }
            }
        }

        Ok(summary)
    }

    /// One delayed retry of the same port on a transient resource
    /// failure, then fall through to the normal recovery ladder.
    fn attempt_port_with_retry(
        &self,
        host: &str,
        port: u16,
        versions: &[SmbVersion],
        summary: &mut HostSummary,
    ) -> SmbResult<Vec<Share>> {
        match self.attempt_port(host, port, versions, summary) {
            Err(e) if e.is_transient_resource() => {
                warn!(host, port, "{e}, retrying once");
                std::thread::sleep(self.retry_delay);
                self.attempt_port(host, port, versions, summary)
            }
            other => other,
        }
    }

    /// Connect, enumerate, disconnect. The disconnect happens on every
    /// exit path.
    fn attempt_port(
        &self,
        host: &str,
        port: u16,
        versions: &[SmbVersion],
        summary: &mut HostSummary,
    ) -> SmbResult<Vec<Share>> {
        let mut session = self.transport.connect(host, port, versions)?;
        let result = self.enumerate_session(session.as_mut(), host, port, summary);
        session.disconnect();
        result
    }

    fn enumerate_session(
        &self,
        session: &mut dyn Session,
        host: &str,
        port: u16,
        summary: &mut HostSummary,
    ) -> SmbResult<Vec<Share>> {
        session.authenticate()?;
        let shares = session.list_shares()?;

        if let Some(os_info) = session.fingerprint() {
            if let Some(text) = os_info.summary() {
                info!(host, "Windows OS: {text}");
                self.sink.report_service(host, port, &text);
            }
            summary.os_info = Some(os_info);
        }

        for share in &shares {
            info!(
                host,
                "{} - ({}) {}",
                share.trimmed_name(),
                share.share_type,
                share.comment
            );
        }
        self.sink.report_shares(host, port, &shares);
        summary.port = Some(port);
        summary.shares = shares.clone();

        if self.policy.spider_shares && !shares.is_empty() {
            let records = spider_host_shares(session, host, &shares, &self.policy, &self.shutdown)?;
            summary.record_count = records.len();

            let mut loot = HostLoot::new(host);
            loot.extend(records);
            match loot.hand_off(self.sink, self.policy.log_format) {
                Ok(location) => summary.loot_location = location,
                // Storage failures never abort enumeration.
                Err(e) => warn!(host, "Failed to persist spider results: {e}"),
            }
        }

        Ok(shares)
    }
}
