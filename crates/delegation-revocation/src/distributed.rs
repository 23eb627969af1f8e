//! Async, gossip-replicated revocation store (§4.6, §5).
//!
//! The seen-set dedup guarantees at-most-once local application per
//! `revocation_id`; gossip delivery order across peers is not guaranteed.
//! Anti-entropy `sync` is idempotent and may race gossip delivery without
//! data loss.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::entry::RevocationEntry;
use crate::error::RevocationError;
use crate::local::LocalRevocationStore;

/// Something that can receive a gossiped revocation and be asked for its
/// current revocation set. Implemented by `DistributedRevocationStore`
/// itself so stores can be wired directly to each other in tests and
/// single-process demos; a networked adapter outside this crate's scope
/// would implement the same trait over a wire protocol.
#[async_trait]
pub trait RevocationPeer: Send + Sync {
    async fn receive_from_peer(&self, entry: RevocationEntry) -> Result<(), RevocationError>;
    async fn get_revocations(&self) -> Vec<RevocationEntry>;
}

#[derive(Clone, Debug)]
pub struct DistributedRevocationConfig {
    /// Exceeding this on `add_peer` is an error.
    pub max_peers: usize,
    /// Anti-entropy sync cadence for `start_sync`.
    pub sync_interval: Duration,
}

impl Default for DistributedRevocationConfig {
    fn default() -> Self {
        Self {
            max_peers: 64,
            sync_interval: Duration::from_secs(30),
        }
    }
}

struct Inner {
    local: LocalRevocationStore,
    seen: std::collections::HashSet<String>,
}

/// Handle to a distributed store's background anti-entropy timer. Dropping
/// this without calling `stop` leaves the timer running — call `stop`
/// explicitly when the store is torn down, mirroring the spec's "timers must
/// be released" rule.
pub struct SyncHandle {
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Synchronous, idempotent: aborting an already-finished task is a no-op.
    pub fn stop(self) {
        self.task.abort();
    }
}

/// Cheaply `Clone`-able (an `Arc` around shared state) so it can be handed to
/// a background sync task and still used by the caller that spawned it.
#[derive(Clone)]
pub struct DistributedRevocationStore {
    inner: Arc<Mutex<Inner>>,
    peers: Arc<Mutex<HashMap<String, Arc<dyn RevocationPeer>>>>,
    subscribers: broadcast::Sender<RevocationEntry>,
    config: DistributedRevocationConfig,
}

impl DistributedRevocationStore {
    pub fn new(config: DistributedRevocationConfig) -> Self {
        let (subscribers, _rx) = broadcast::channel(1024);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                local: LocalRevocationStore::new(),
                seen: std::collections::HashSet::new(),
            })),
            peers: Arc::new(Mutex::new(HashMap::new())),
            subscribers,
            config,
        }
    }

    /// Subscribe to a live feed of every revocation this store newly learns
    /// about, whether locally originated, gossiped in, or pulled via sync.
    pub fn subscribe(&self) -> broadcast::Receiver<RevocationEntry> {
        self.subscribers.subscribe()
    }

    pub async fn add_peer(
        &self,
        peer_id: impl Into<String>,
        peer: Arc<dyn RevocationPeer>,
    ) -> Result<(), RevocationError> {
        let mut peers = self.peers.lock().await;
        if peers.len() >= self.config.max_peers {
            return Err(RevocationError::MaxPeersExceeded {
                max: self.config.max_peers,
                got: peers.len(),
            });
        }
        peers.insert(peer_id.into(), peer);
        Ok(())
    }

    pub async fn remove_peer(&self, peer_id: &str) {
        self.peers.lock().await.remove(peer_id);
    }

    pub async fn peer_count(&self) -> usize {
        self.peers.lock().await.len()
    }

    /// Locally originates a revocation and propagates it. Verifies the
    /// signature, dedups against the seen-set, stores, notifies subscribers,
    /// then broadcasts to every peer with join-all-results semantics: one
    /// peer rejecting or erroring never aborts delivery to the others.
    pub async fn revoke(&self, entry: RevocationEntry) -> Result<(), RevocationError> {
        if !entry.verify() {
            return Err(RevocationError::InvalidSignature);
        }
        if !self.record_if_new(&entry).await {
            debug!(revocation_id = %entry.revocation_id, "revoke: already seen, no-op");
            return Ok(());
        }
        let _ = self.subscribers.send(entry.clone());
        self.broadcast(entry).await;
        Ok(())
    }

    /// Entry point for gossip delivered by a peer. Same dedup + store +
    /// notify as `revoke`, then re-broadcasts to this node's own peers so the
    /// epidemic spreads — bounded by the seen-set so it terminates in O(graph
    /// diameter) broadcast rounds rather than looping forever.
    pub async fn receive_from_peer(&self, entry: RevocationEntry) -> Result<(), RevocationError> {
        if !entry.verify() {
            return Err(RevocationError::InvalidSignature);
        }
        if !self.record_if_new(&entry).await {
            return Ok(());
        }
        let _ = self.subscribers.send(entry.clone());
        self.broadcast(entry).await;
        Ok(())
    }

    /// Pull-based anti-entropy: sequentially ask each peer for its full
    /// revocation set and ingest anything unseen. Entries with an invalid
    /// signature are skipped silently (logged at `warn`) rather than
    /// aborting the sync pass.
    pub async fn sync(&self) -> Result<(), RevocationError> {
        let peers: Vec<Arc<dyn RevocationPeer>> = self.peers.lock().await.values().cloned().collect();
        for peer in peers {
            let remote_entries = peer.get_revocations().await;
            for entry in remote_entries {
                if !entry.verify() {
                    warn!(revocation_id = %entry.revocation_id, "sync: skipping entry with invalid signature");
                    continue;
                }
                if self.record_if_new(&entry).await {
                    let _ = self.subscribers.send(entry);
                }
            }
        }
        Ok(())
    }

    /// Spawns a `tokio::time::interval`-driven background task that calls
    /// `sync` at `config.sync_interval`. The returned handle must be `stop`ped
    /// when the store is torn down.
    pub fn start_sync(&self) -> SyncHandle {
        let store = self.clone();
        let interval = self.config.sync_interval;
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if let Err(e) = store.sync().await {
                    warn!(error = %e, "anti-entropy sync pass failed");
                } else {
                    info!("anti-entropy sync pass complete");
                }
            }
        });
        SyncHandle { task }
    }

    pub async fn is_revoked(&self, revocation_id: &str) -> bool {
        self.inner.lock().await.local.is_revoked(revocation_id)
    }

    pub async fn list(&self) -> Vec<RevocationEntry> {
        self.inner.lock().await.local.list()
    }

    pub async fn get_revocation_ids(&self) -> std::collections::HashSet<String> {
        self.inner.lock().await.local.get_revocation_ids()
    }

    /// Atomically checks the seen-set and, if new, inserts into the local
    /// store — the critical section that must not interleave with a
    /// concurrent `receive_from_peer` to preserve the at-most-once dedup
    /// invariant.
    async fn record_if_new(&self, entry: &RevocationEntry) -> bool {
        let mut guard = self.inner.lock().await;
        if guard.seen.contains(&entry.revocation_id) {
            return false;
        }
        guard.seen.insert(entry.revocation_id.clone());
        guard.local.add_trusted(entry.clone());
        true
    }

    async fn broadcast(&self, entry: RevocationEntry) {
        let peers: Vec<Arc<dyn RevocationPeer>> = self.peers.lock().await.values().cloned().collect();
        let results = join_all(peers.iter().map(|peer| peer.receive_from_peer(entry.clone()))).await;
        for result in results {
            if let Err(e) = result {
                warn!(error = %e, "peer rejected gossiped revocation, continuing with others");
            }
        }
    }
}

#[async_trait]
impl RevocationPeer for DistributedRevocationStore {
    async fn receive_from_peer(&self, entry: RevocationEntry) -> Result<(), RevocationError> {
        DistributedRevocationStore::receive_from_peer(self, entry).await
    }

    async fn get_revocations(&self) -> Vec<RevocationEntry> {
        self.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{create_revocation_entry, RevocationScope};
    use delegation_core::Timestamp;
    use delegation_crypto::generate_keypair;

    fn store() -> DistributedRevocationStore {
        DistributedRevocationStore::new(DistributedRevocationConfig::default())
    }

    #[tokio::test]
    async fn revoke_is_idempotent_and_notifies_subscribers() {
        let kp = generate_keypair(None);
        let entry =
            create_revocation_entry(&kp, "rev_1", RevocationScope::Block, Timestamp::now())
                .unwrap();
        let node = store();
        let mut rx = node.subscribe();
        node.revoke(entry.clone()).await.unwrap();
        assert!(node.is_revoked("rev_1").await);
        let received = rx.try_recv().unwrap();
        assert_eq!(received.revocation_id, "rev_1");

        // Second revoke of the same id is a no-op, not a second notification.
        node.revoke(entry).await.unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn invalid_signature_rejected() {
        let kp = generate_keypair(None);
        let mut entry =
            create_revocation_entry(&kp, "rev_1", RevocationScope::Block, Timestamp::now())
                .unwrap();
        entry.signature = "garbage".into();
        let node = store();
        assert!(node.revoke(entry).await.is_err());
    }

    #[tokio::test]
    async fn max_peers_enforced() {
        let node = DistributedRevocationStore::new(DistributedRevocationConfig {
            max_peers: 1,
            ..Default::default()
        });
        let a = Arc::new(store());
        let b = Arc::new(store());
        node.add_peer("a", a).await.unwrap();
        assert!(node.add_peer("b", b).await.is_err());
    }

    #[tokio::test]
    async fn gossip_converges_across_three_nodes_line_topology() {
        let s1 = store();
        let s2 = store();
        let s3 = store();

        s1.add_peer("s2", Arc::new(s2.clone())).await.unwrap();
        s2.add_peer("s1", Arc::new(s1.clone())).await.unwrap();
        s2.add_peer("s3", Arc::new(s3.clone())).await.unwrap();
        s3.add_peer("s2", Arc::new(s2.clone())).await.unwrap();

        let kp = generate_keypair(None);
        let entry =
            create_revocation_entry(&kp, "rev_x", RevocationScope::Chain, Timestamp::now())
                .unwrap();

        s1.revoke(entry.clone()).await.unwrap();

        assert!(s1.is_revoked("rev_x").await);
        assert!(s2.is_revoked("rev_x").await);
        assert!(s3.is_revoked("rev_x").await);
    }

    #[tokio::test]
    async fn sync_pulls_unseen_entries_from_peer() {
        let s1 = store();
        let s2 = store();
        let kp = generate_keypair(None);
        let entry =
            create_revocation_entry(&kp, "rev_y", RevocationScope::Block, Timestamp::now())
                .unwrap();
        // s2 knows about it but is not connected for gossip; s1 pulls via sync.
        s2.revoke(entry).await.unwrap();
        s1.add_peer("s2", Arc::new(s2.clone())).await.unwrap();
        assert!(!s1.is_revoked("rev_y").await);
        s1.sync().await.unwrap();
        assert!(s1.is_revoked("rev_y").await);
    }

    #[tokio::test]
    async fn start_sync_and_stop_is_idempotent() {
        let node = store();
        let handle = node.start_sync();
        handle.stop();
    }
}
