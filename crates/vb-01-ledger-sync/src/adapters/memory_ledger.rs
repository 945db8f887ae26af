//! # In-Memory Ledger
//!
//! Mutable stand-in for the voting contract. Backs the runtime when no RPC
//! endpoint is configured and drives every reconciliation test.

use crate::domain::entities::{ElectionId, LedgerElection};
use crate::domain::errors::LedgerError;
use crate::ports::outbound::{LedgerClient, LedgerNetwork, TransactionId};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

#[derive(Default)]
struct LedgerState {
    elections: Vec<LedgerElection>,
    tallies: HashMap<ElectionId, Vec<u64>>,
    count_unreachable: bool,
    unreachable: HashSet<ElectionId>,
    results_unreachable: HashSet<ElectionId>,
    transactions: u64,
}

/// In-process ledger with fault injection.
#[derive(Default)]
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-populated with elections at indices `0..elections.len()`.
    pub fn with_elections(elections: Vec<LedgerElection>) -> Self {
        let ledger = Self::new();
        ledger.state.write().elections = elections;
        ledger
    }

    /// Append an election and return its index.
    pub fn push(&self, election: LedgerElection) -> ElectionId {
        let mut state = self.state.write();
        state.elections.push(election);
        (state.elections.len() - 1) as ElectionId
    }

    /// Replace the election at `id`.
    pub fn replace(&self, id: ElectionId, election: LedgerElection) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        let count = state.elections.len() as u64;
        let slot = state
            .elections
            .get_mut(id as usize)
            .ok_or(LedgerError::ElectionNotFound { id, count })?;
        *slot = election;
        Ok(())
    }

    /// Set the per-option tally of `id`.
    pub fn set_results(&self, id: ElectionId, counts: Vec<u64>) {
        self.state.write().tallies.insert(id, counts);
    }

    /// Make `election_count` fail with a transport error.
    pub fn set_count_unreachable(&self, unreachable: bool) {
        self.state.write().count_unreachable = unreachable;
    }

    /// Make every read of `id` fail with a transport error.
    pub fn set_election_unreachable(&self, id: ElectionId, unreachable: bool) {
        let mut state = self.state.write();
        if unreachable {
            state.unreachable.insert(id);
        } else {
            state.unreachable.remove(&id);
        }
    }

    /// Make only `election_results(id)` fail with a transport error.
    pub fn set_results_unreachable(&self, id: ElectionId, unreachable: bool) {
        let mut state = self.state.write();
        if unreachable {
            state.results_unreachable.insert(id);
        } else {
            state.results_unreachable.remove(&id);
        }
    }

    fn read(&self, id: ElectionId) -> Result<LedgerElection, LedgerError> {
        let state = self.state.read();
        if state.unreachable.contains(&id) {
            return Err(LedgerError::Transport(format!(
                "election {id} unreachable"
            )));
        }
        state
            .elections
            .get(id as usize)
            .cloned()
            .ok_or(LedgerError::ElectionNotFound {
                id,
                count: state.elections.len() as u64,
            })
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn election_count(&self) -> Result<u64, LedgerError> {
        let state = self.state.read();
        if state.count_unreachable {
            return Err(LedgerError::Transport("ledger unreachable".into()));
        }
        Ok(state.elections.len() as u64)
    }

    async fn election_info(&self, id: ElectionId) -> Result<LedgerElection, LedgerError> {
        self.read(id)
    }

    async fn election_results(&self, id: ElectionId) -> Result<Vec<u64>, LedgerError> {
        let election = self.read(id)?;
        let state = self.state.read();
        if state.results_unreachable.contains(&id) {
            return Err(LedgerError::Transport(format!(
                "results of election {id} unreachable"
            )));
        }
        Ok(state
            .tallies
            .get(&id)
            .cloned()
            .unwrap_or_else(|| vec![0; election.options.len()]))
    }

    async fn finalize(&self, id: ElectionId) -> Result<TransactionId, LedgerError> {
        let mut state = self.state.write();
        let count = state.elections.len() as u64;
        let election = state
            .elections
            .get_mut(id as usize)
            .ok_or(LedgerError::ElectionNotFound { id, count })?;
        if election.finalized {
            return Err(LedgerError::Rejected(format!(
                "election {id} already finalized"
            )));
        }
        election.finalized = true;
        state.transactions += 1;
        Ok(format!("0x{:064x}", state.transactions))
    }

    async fn network(&self) -> Result<LedgerNetwork, LedgerError> {
        Ok(LedgerNetwork {
            contract_address: "in-memory".into(),
            network_name: "In-Memory".into(),
        })
    }
}
