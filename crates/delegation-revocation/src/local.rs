//! Single-node revocation store: signature-checked on `add`, trusted on
//! `from_json` (callers restoring from persistence are assumed to have
//! already trusted that snapshot).

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::entry::RevocationEntry;
use crate::error::RevocationError;

#[derive(Clone, Debug, Default)]
pub struct LocalRevocationStore {
    entries: HashMap<String, RevocationEntry>,
}

impl LocalRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verifies `entry.signature`, then inserts keyed by `revocation_id`.
    /// Idempotent: re-adding the same id overwrites with the (necessarily
    /// identical, signature-verified) entry.
    pub fn add(&mut self, entry: RevocationEntry) -> Result<(), RevocationError> {
        if !entry.verify() {
            return Err(RevocationError::InvalidSignature);
        }
        debug!(revocation_id = %entry.revocation_id, "revocation recorded");
        self.entries.insert(entry.revocation_id.clone(), entry);
        Ok(())
    }

    /// Inserts without re-verifying the signature. For callers (the
    /// distributed store, `from_json`) that have already established trust
    /// in the entry by some other means.
    pub fn add_trusted(&mut self, entry: RevocationEntry) {
        self.entries.insert(entry.revocation_id.clone(), entry);
    }

    pub fn is_revoked(&self, revocation_id: &str) -> bool {
        self.entries.contains_key(revocation_id)
    }

    pub fn list(&self) -> Vec<RevocationEntry> {
        self.entries.values().cloned().collect()
    }

    pub fn get_revocation_ids(&self) -> HashSet<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn remove(&mut self, revocation_id: &str) -> Option<RevocationEntry> {
        self.entries.remove(revocation_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String, RevocationError> {
        serde_json::to_string(&self.list()).map_err(|e| RevocationError::Serialization(e.to_string()))
    }

    /// Restores a snapshot without re-verifying any signature — the spec is
    /// explicit that this path bypasses signature checks; callers must trust
    /// the persistence layer that produced the snapshot.
    pub fn from_json(json: &str) -> Result<Self, RevocationError> {
        let entries: Vec<RevocationEntry> =
            serde_json::from_str(json).map_err(|e| RevocationError::Serialization(e.to_string()))?;
        let mut store = Self::new();
        for entry in entries {
            store.add_trusted(entry);
        }
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{create_revocation_entry, RevocationScope};
    use delegation_core::Timestamp;
    use delegation_crypto::generate_keypair;

    #[test]
    fn add_rejects_invalid_signature() {
        let kp = generate_keypair(None);
        let mut entry =
            create_revocation_entry(&kp, "rev_1", RevocationScope::Block, Timestamp::now())
                .unwrap();
        entry.signature = "not-a-real-signature".into();
        let mut store = LocalRevocationStore::new();
        assert!(store.add(entry).is_err());
    }

    #[test]
    fn add_is_idempotent() {
        let kp = generate_keypair(None);
        let entry =
            create_revocation_entry(&kp, "rev_1", RevocationScope::Block, Timestamp::now())
                .unwrap();
        let mut store = LocalRevocationStore::new();
        store.add(entry.clone()).unwrap();
        store.add(entry).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn json_round_trip_bypasses_signature_check() {
        let kp = generate_keypair(None);
        let mut entry =
            create_revocation_entry(&kp, "rev_1", RevocationScope::Block, Timestamp::now())
                .unwrap();
        let mut store = LocalRevocationStore::new();
        store.add(entry.clone()).unwrap();
        let json = store.to_json().unwrap();

        entry.signature = "corrupted-after-persist".into();
        // Even a corrupted serialized entry restores fine since from_json
        // does not re-verify.
        let raw = format!("[{}]", serde_json::to_string(&entry).unwrap());
        let restored = LocalRevocationStore::from_json(&raw).unwrap();
        assert!(restored.is_revoked("rev_1"));

        let restored_clean = LocalRevocationStore::from_json(&json).unwrap();
        assert!(restored_clean.is_revoked("rev_1"));
    }

    #[test]
    fn remove_and_get_ids() {
        let kp = generate_keypair(None);
        let e1 = create_revocation_entry(&kp, "rev_1", RevocationScope::Block, Timestamp::now())
            .unwrap();
        let e2 = create_revocation_entry(&kp, "rev_2", RevocationScope::Chain, Timestamp::now())
            .unwrap();
        let mut store = LocalRevocationStore::new();
        store.add(e1).unwrap();
        store.add(e2).unwrap();
        assert_eq!(store.get_revocation_ids().len(), 2);
        assert!(store.remove("rev_1").is_some());
        assert_eq!(store.len(), 1);
    }
}
