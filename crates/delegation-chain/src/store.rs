//! Chain store (§4.7): a mapping from delegation id to `Delegation`, plus
//! traversal and structural-integrity verification. Verifies only the
//! directed-graph shape (parent/child linkage, `from`/`to` continuity,
//! monotonic depth) — it never touches DCT signatures, that's
//! `delegation_dct`'s job.

use std::collections::HashMap;

use delegation_core::{PrincipalId, Timestamp, ROOT_DELEGATION_ID};
use tracing::debug;

use crate::error::ChainError;
use crate::types::{Delegation, DelegationStatus};

#[derive(Clone, Debug, Default)]
pub struct ChainStore {
    records: HashMap<String, Delegation>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChainVerification {
    pub valid: bool,
    pub error: Option<String>,
}

impl ChainStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite by id.
    pub fn put(&mut self, delegation: Delegation) {
        debug!(id = %delegation.id, depth = delegation.depth, "delegation recorded");
        self.records.insert(delegation.id.clone(), delegation);
    }

    pub fn get(&self, id: &str) -> Option<&Delegation> {
        self.records.get(id)
    }

    /// Every record whose `parentId` equals `parent_id`.
    pub fn get_children(&self, parent_id: &str) -> Vec<&Delegation> {
        self.records
            .values()
            .filter(|d| d.parent_id == parent_id)
            .collect()
    }

    /// Mutates `status`/`attestation_id`, stamping `completed_at` when the
    /// new status is `completed` or `failed`. A terminal record refuses any
    /// further transition — the state machine in §4.10 never leaves a
    /// terminal state.
    pub fn update_status(
        &mut self,
        id: &str,
        status: DelegationStatus,
        attestation_id: Option<String>,
        now: Timestamp,
    ) -> Result<(), ChainError> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| ChainError::NotFound(id.to_string()))?;
        if record.status.is_terminal() {
            return Err(ChainError::TerminalStatus {
                from: record.status,
                to: status,
            });
        }
        record.status = status;
        if let Some(attestation_id) = attestation_id {
            record.attestation_id = Some(attestation_id);
        }
        if matches!(status, DelegationStatus::Completed | DelegationStatus::Failed) {
            record.completed_at = Some(now);
        }
        Ok(())
    }

    /// Walks `parentId` links from `id` up to the root sentinel, returning
    /// the chain ordered root-first.
    pub fn get_chain(&self, id: &str) -> Result<Vec<Delegation>, ChainError> {
        let mut chain = Vec::new();
        let mut current = self
            .records
            .get(id)
            .ok_or_else(|| ChainError::NotFound(id.to_string()))?
            .clone();
        loop {
            let parent_id = current.parent_id.clone();
            chain.push(current);
            if parent_id == ROOT_DELEGATION_ID {
                break;
            }
            current = self
                .records
                .get(&parent_id)
                .ok_or_else(|| ChainError::NotFound(parent_id))?
                .clone();
        }
        chain.reverse();
        Ok(chain)
    }

    /// Structural verification only: for every adjacent pair in the chain
    /// leading to `id`, checks `child.parentId == parent.id`,
    /// `child.from == parent.to`, and `child.depth == parent.depth + 1`.
    pub fn verify_chain(&self, id: &str) -> ChainVerification {
        let chain = match self.get_chain(id) {
            Ok(chain) => chain,
            Err(e) => {
                return ChainVerification {
                    valid: false,
                    error: Some(e.to_string()),
                }
            }
        };
        for pair in chain.windows(2) {
            let (parent, child) = (&pair[0], &pair[1]);
            if child.parent_id != parent.id {
                return bad(format!(
                    "{}: parentId {} does not match parent record id {}",
                    child.id, child.parent_id, parent.id
                ));
            }
            if child.from != parent.to {
                return bad(format!(
                    "{}: from {} does not match parent's to {}",
                    child.id, child.from, parent.to
                ));
            }
            if child.depth != parent.depth + 1 {
                return bad(format!(
                    "{}: depth {} is not parent depth {} + 1",
                    child.id, child.depth, parent.depth
                ));
            }
        }
        if let Some(root) = chain.first() {
            if root.depth == 0 && root.parent_id != ROOT_DELEGATION_ID {
                return bad(format!(
                    "{}: depth 0 record must have parentId {ROOT_DELEGATION_ID}",
                    root.id
                ));
            }
        }
        ChainVerification {
            valid: true,
            error: None,
        }
    }
}

fn bad(error: String) -> ChainVerification {
    ChainVerification {
        valid: false,
        error: Some(error),
    }
}
