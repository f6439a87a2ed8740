//! Producer session state: identity handshake and sequence ledger.
//!
//! [`ProducerSession`] is the synchronization point between the background
//! coordinator task (which talks to the broker) and the application tasks
//! that produce messages:
//!
//! - The background task calls [`assign`](ProducerSession::assign) when the
//!   broker confirms an identity, and [`reset`](ProducerSession::reset) when
//!   the session hits an irrecoverable broker error.
//! - Application tasks call
//!   [`await_identity`](ProducerSession::await_identity) before their first
//!   send and use the sequence accessors while framing idempotent batches.
//!
//! One session instance corresponds to one logical producer session: the
//! period between acquiring a valid identity and the next `reset`. A reset
//! starts a new session in place — identity back to unassigned, every
//! sequence counter back to zero — without reconstructing the object.
//!
//! # Locking protocol
//!
//! A single mutex guards the identity together with the sequence ledger, so
//! a reset is indivisible: no task can observe the cleared identity paired
//! with stale counters, or the reverse. Waiters park on a [`Notify`] with
//! the wakeup permit requested *before* the condition re-check, closing the
//! missed-wakeup window between "saw no identity" and "went to sleep". No
//! lock is held while parked.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::types::{PartitionId, ProducerEpoch, ProducerId, ProducerIdentity};

/// State shared under the session mutex.
///
/// Identity and ledger live under one lock so `reset` can replace both in a
/// single critical section.
struct SessionState {
    /// Current broker-assigned identity; `ProducerIdentity::NONE` until the
    /// handshake completes.
    identity: ProducerIdentity,
    /// Next sequence number per destination partition. A destination absent
    /// from the map is equivalent to a counter of zero.
    sequences: HashMap<PartitionId, u32>,
}

/// Identity and sequence coordinator for one producer session.
///
/// Safe to share across tasks via `Arc`; all operations take `&self`.
pub struct ProducerSession {
    state: Mutex<SessionState>,
    /// Broadcast wakeup for tasks parked in `await_identity`.
    identity_ready: Notify,
    /// Whether this producer tracks sequence numbers. Fixed at construction;
    /// ledger access while disabled is a caller contract violation.
    idempotence_enabled: bool,
}

impl ProducerSession {
    /// Create a session with no identity assigned and an empty ledger.
    pub fn new(idempotence_enabled: bool) -> Self {
        Self {
            state: Mutex::new(SessionState {
                identity: ProducerIdentity::NONE,
                sequences: HashMap::new(),
            }),
            identity_ready: Notify::new(),
            idempotence_enabled,
        }
    }

    /// Whether sequence numbers are tracked for this session.
    pub fn idempotence_enabled(&self) -> bool {
        self.idempotence_enabled
    }

    /// Check whether the broker has assigned an identity.
    ///
    /// Best-effort snapshot; non-blocking and side-effect free.
    pub fn has_identity(&self) -> bool {
        self.lock_state().identity.is_valid()
    }

    /// Non-blocking snapshot of the current identity.
    ///
    /// For callers that already know an identity exists; use
    /// [`await_identity`](Self::await_identity) otherwise.
    pub fn identity(&self) -> ProducerIdentity {
        self.lock_state().identity
    }

    /// Wait until the broker has assigned an identity, or until `max_wait`
    /// elapses, then return a snapshot of the current identity.
    ///
    /// A timeout is not an error: the returned snapshot is simply still
    /// invalid, and callers must check [`ProducerIdentity::is_valid`] before
    /// using it. `max_wait` of zero polls the current state without parking.
    ///
    /// Any number of tasks may wait concurrently; a single valid
    /// [`assign`](Self::assign) releases all of them. Dropping the returned
    /// future cancels the wait without yielding a value, so cancellation is
    /// never mistaken for a timeout.
    pub async fn await_identity(&self, max_wait: Duration) -> ProducerIdentity {
        let deadline = tokio::time::Instant::now() + max_wait;
        loop {
            // Request the wakeup permit before re-checking the condition:
            // an assign that lands between the check and the park below is
            // still observed by this future.
            let notified = self.identity_ready.notified();
            {
                let state = self.lock_state();
                if state.identity.is_valid() {
                    return state.identity;
                }
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.identity();
            }
        }
    }

    /// Store the identity the broker assigned and wake every parked waiter.
    ///
    /// Only the background coordinator calls this, exactly once per
    /// successful handshake. The store is atomic with respect to concurrent
    /// readers: no task observes a torn id/epoch pair. Waiters are only
    /// notified when the new id is valid.
    pub fn assign(&self, id: ProducerId, epoch: ProducerEpoch) {
        let identity = ProducerIdentity::new(id, epoch);
        {
            let mut state = self.lock_state();
            state.identity = identity;
        }
        if identity.is_valid() {
            debug!(producer_id = %id, producer_epoch = %epoch, "producer identity assigned");
            self.identity_ready.notify_waiters();
        }
    }

    /// Revert to an unassigned identity and clear every sequence counter.
    ///
    /// This is the recovery path for an irrecoverable broker error: the
    /// producer must re-acquire an identity and restart sequencing from zero
    /// for every destination. Both effects happen in one critical section,
    /// so no task observes the cleared identity alongside stale counters or
    /// vice versa.
    pub fn reset(&self) {
        {
            let mut state = self.lock_state();
            state.identity = ProducerIdentity::NONE;
            state.sequences.clear();
        }
        warn!("producer session reset, identity and sequence state cleared");
    }

    /// The next sequence number to be written to `partition`, without
    /// consuming it.
    ///
    /// Destinations that have never been advanced report zero.
    ///
    /// # Errors
    ///
    /// [`Error::IdempotenceDisabled`] when the session was constructed with
    /// idempotence disabled.
    pub fn sequence_number(&self, partition: &PartitionId) -> Result<u32> {
        if !self.idempotence_enabled {
            return Err(Error::IdempotenceDisabled);
        }
        let state = self.lock_state();
        Ok(state.sequences.get(partition).copied().unwrap_or(0))
    }

    /// Advance the sequence counter for `partition` by `delta`, the number
    /// of records just sent.
    ///
    /// The counter wraps modulo 2^32, matching the wraparound the wire
    /// protocol applies to sequence numbers. Negative deltas are
    /// unrepresentable by construction.
    ///
    /// # Errors
    ///
    /// [`Error::IdempotenceDisabled`] when the session was constructed with
    /// idempotence disabled.
    pub fn increment_sequence(&self, partition: &PartitionId, delta: u32) -> Result<()> {
        if !self.idempotence_enabled {
            return Err(Error::IdempotenceDisabled);
        }
        let mut state = self.lock_state();
        let counter = state.sequences.entry(partition.clone()).or_insert(0);
        *counter = counter.wrapping_add(delta);
        trace!(partition = %partition, delta, sequence = *counter, "sequence advanced");
        Ok(())
    }

    /// Acquire the session mutex.
    ///
    /// The guarded sections never panic mid-update, so a poisoned lock still
    /// holds consistent state and the guard is recovered rather than
    /// propagating the poison.
    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ProducerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock_state();
        f.debug_struct("ProducerSession")
            .field("identity", &state.identity)
            .field("tracked_partitions", &state.sequences.len())
            .field("idempotence_enabled", &self.idempotence_enabled)
            .finish()
    }
}
