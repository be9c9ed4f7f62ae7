//! Multi-host scan coordinator
//!
//! Fans a target list out to a bounded pool of scoped worker threads
//! over a crossbeam channel. Each worker owns one [`HostEnumerator`]
//! and runs its hosts strictly one at a time, so per-host sequencing is
//! preserved while distinct hosts proceed in parallel. An interrupt on
//! any worker raises the shared shutdown flag and drains the rest.

use crate::error::{ConfigError, Result, SpiderError};
use crate::policy::EnumerationPolicy;
use crate::sink::PersistenceSink;
use crate::smb::SessionTransport;
use crate::walker::orchestrator::{HostEnumerator, HostSummary};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info};

/// Upper bound on concurrent scan workers
pub const MAX_WORKERS: usize = 128;

/// Runs an enumeration policy against many hosts concurrently
pub struct ScanCoordinator {
    policy: EnumerationPolicy,
    worker_count: usize,
    shutdown: Arc<AtomicBool>,
}

impl ScanCoordinator {
    /// Create a coordinator with a validated worker count
    pub fn new(policy: EnumerationPolicy, worker_count: usize) -> std::result::Result<Self, ConfigError> {
        if worker_count == 0 || worker_count > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: worker_count,
                max: MAX_WORKERS,
            });
        }
        Ok(Self {
            policy,
            worker_count,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Shared shutdown flag; setting it stops all workers at their next
    /// checkpoint.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Enumerate every target, returning one summary per host reached
    ///
    /// Summaries arrive in completion order, not target order. Returns
    /// `Interrupted` when the shutdown flag was raised mid-scan; hosts
    /// finished before the interrupt are dropped with it.
    pub fn run(
        &self,
        targets: &[String],
        transport: &dyn SessionTransport,
        sink: &dyn PersistenceSink,
    ) -> Result<Vec<HostSummary>> {
        let (work_tx, work_rx) = crossbeam_channel::unbounded::<String>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<Result<HostSummary>>();

        for target in targets {
            work_tx
                .send(target.clone())
                .map_err(|_| SpiderError::ChannelClosed)?;
        }
        drop(work_tx);

        let workers = self.worker_count.min(targets.len().max(1));
        info!(workers, targets = targets.len(), "Starting scan");

        thread::scope(|scope| {
            for worker in 0..workers {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let enumerator = HostEnumerator::new(transport, sink, self.policy.clone())
                    .with_shutdown(Arc::clone(&self.shutdown));

                scope.spawn(move || {
                    for host in work_rx.iter() {
                        debug!(worker, host = %host, "Worker picked up host");
                        let outcome = enumerator.run_host(&host);
                        let interrupted = matches!(outcome, Err(SpiderError::Interrupted));
                        if result_tx.send(outcome).is_err() || interrupted {
                            break;
                        }
                    }
                });
            }
        });
        drop(result_tx);

        let mut summaries = Vec::with_capacity(targets.len());
        let mut interrupted = false;
        for outcome in result_rx.iter() {
            match outcome {
                Ok(summary) => summaries.push(summary),
                Err(SpiderError::Interrupted) => {
                    self.shutdown.store(true, Ordering::Relaxed);
                    interrupted = true;
                }
                Err(e) => return Err(e),
            }
        }

        if interrupted {
            return Err(SpiderError::Interrupted);
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SmbError, SmbResult};
    use crate::sink::MemorySink;
    use crate::smb::types::{OsInfo, PermissionFlags, Share, ShareType};
    use crate::smb::{Session, SmbVersion, TreeHandle};
    use crate::smb::types::DirectoryEntry;
    use std::sync::Mutex;

    /// Transport where every host immediately yields the same shares
    #[derive(Default)]
    struct UniformTransport {
        connects: Mutex<Vec<(String, u16)>>,
    }

    impl SessionTransport for UniformTransport {
        fn connect(
            &self,
            host: &str,
            port: u16,
            _versions: &[SmbVersion],
        ) -> SmbResult<Box<dyn Session>> {
            self.connects.lock().unwrap().push((host.to_string(), port));
            Ok(Box::new(UniformSession))
        }
    }

    struct UniformSession;

    impl Session for UniformSession {
        fn authenticate(&mut self) -> SmbResult<()> {
            Ok(())
        }

        fn list_shares(&mut self) -> SmbResult<Vec<Share>> {
            Ok(vec![Share::new("Data", ShareType::Disk, "")])
        }

        fn open_tree(&mut self, _host: &str, _share_name: &str) -> SmbResult<Box<dyn TreeHandle>> {
            Ok(Box::new(EmptyTree))
        }

        fn fingerprint(&mut self) -> Option<OsInfo> {
            None
        }

        fn disconnect(&mut self) {}
    }

    struct EmptyTree;

    impl TreeHandle for EmptyTree {
        fn permissions(&self) -> PermissionFlags {
            PermissionFlags::read_only()
        }

        fn list(&mut self, _path: &str) -> SmbResult<Vec<DirectoryEntry>> {
            Ok(Vec::new())
        }
    }

    /// Transport that never accepts a connection
    struct UnreachableTransport;

    impl SessionTransport for UnreachableTransport {
        fn connect(
            &self,
            host: &str,
            port: u16,
            _versions: &[SmbVersion],
        ) -> SmbResult<Box<dyn Session>> {
            Err(SmbError::ConnectionTimeout {
                host: host.to_string(),
                port,
            })
        }
    }

    fn targets(count: usize) -> Vec<String> {
        (1..=count).map(|i| format!("10.0.0.{i}")).collect()
    }

    #[test]
    fn test_worker_count_validated() {
        assert!(matches!(
            ScanCoordinator::new(EnumerationPolicy::default(), 0),
            Err(ConfigError::InvalidWorkerCount { count: 0, .. })
        ));
        assert!(matches!(
            ScanCoordinator::new(EnumerationPolicy::default(), MAX_WORKERS + 1),
            Err(ConfigError::InvalidWorkerCount { .. })
        ));
        assert!(ScanCoordinator::new(EnumerationPolicy::default(), MAX_WORKERS).is_ok());
    }

    #[test]
    fn test_every_target_summarized() {
        let transport = UniformTransport::default();
        let sink = MemorySink::new();
        let coordinator = ScanCoordinator::new(EnumerationPolicy::default(), 4).unwrap();

        let summaries = coordinator
            .run(&targets(9), &transport, &sink)
            .unwrap();

        assert_eq!(summaries.len(), 9);
        let mut hosts: Vec<String> = summaries.iter().map(|s| s.host.clone()).collect();
        hosts.sort();
        let mut expected = targets(9);
        expected.sort();
        assert_eq!(hosts, expected);
        assert!(summaries.iter().all(|s| s.shares.len() == 1));
        assert_eq!(sink.share_reports().len(), 9);
    }

    #[test]
    fn test_unreachable_hosts_produce_empty_summaries() {
        let sink = MemorySink::new();
        let coordinator = ScanCoordinator::new(EnumerationPolicy::default(), 2).unwrap();

        let summaries = coordinator
            .run(&targets(3), &UnreachableTransport, &sink)
            .unwrap();

        assert_eq!(summaries.len(), 3);
        assert!(summaries.iter().all(|s| s.port.is_none()));
        assert!(summaries.iter().all(|s| s.shares.is_empty()));
        assert!(sink.share_reports().is_empty());
    }

    #[test]
    fn test_preset_shutdown_interrupts_run() {
        let transport = UniformTransport::default();
        let sink = MemorySink::new();
        let coordinator = ScanCoordinator::new(EnumerationPolicy::default(), 2).unwrap();
        coordinator.shutdown_flag().store(true, Ordering::Relaxed);

        let result = coordinator.run(&targets(3), &transport, &sink);
        assert!(matches!(result, Err(SpiderError::Interrupted)));
        assert!(transport.connects.lock().unwrap().is_empty());
    }

    #[test]
    fn test_empty_target_list() {
        let transport = UniformTransport::default();
        let sink = MemorySink::new();
        let coordinator = ScanCoordinator::new(EnumerationPolicy::default(), 2).unwrap();

        let summaries = coordinator.run(&[], &transport, &sink).unwrap();
        assert!(summaries.is_empty());
    }
}
