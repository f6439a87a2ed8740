//! # Sequent
//! Client-side producer identity and sequence coordination for idempotent
//! messaging.
//!
//! In a partitioned messaging system, idempotent and transactional production
//! relies on a broker-assigned producer identity (a 64-bit id plus a 16-bit
//! epoch) and a strictly increasing sequence number per destination
//! partition. The broker uses both to detect duplicate or out-of-order
//! deliveries when a producer retries a write.
//!
//! This crate provides the coordination primitive that sits between the two
//! halves of such a producer:
//!
//! - a **background coordinator** task that completes the identity handshake
//!   with the broker and publishes the result via
//!   [`ProducerSession::assign`], or tears the session down via
//!   [`ProducerSession::reset`] after an irrecoverable broker error;
//! - any number of **application** tasks that park in
//!   [`ProducerSession::await_identity`] before their first send and drive
//!   the per-partition sequence ledger while framing idempotent batches.
//!
//! The session guarantees that waiters are never left parked once an
//! identity arrives, that no reader ever observes a torn identity, and that
//! a reset replaces the identity and clears every sequence counter in one
//! indivisible step.
//!
//! [`ProducerSession::assign`]: session::ProducerSession::assign
//! [`ProducerSession::reset`]: session::ProducerSession::reset
//! [`ProducerSession::await_identity`]: session::ProducerSession::await_identity
//!
//! # Example
//!
//! ```rust
//! use sequent::prelude::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> sequent::error::Result<()> {
//! let session = Arc::new(ProducerSession::new(true));
//!
//! // Background coordinator publishes the broker's answer.
//! let publisher = session.clone();
//! tokio::spawn(async move {
//!     publisher.assign(ProducerId::new(42), ProducerEpoch::new(0));
//! });
//!
//! // Application task blocks until the identity is known.
//! let identity = session.await_identity(Duration::from_secs(5)).await;
//! assert!(identity.is_valid());
//!
//! // Frame an idempotent batch of 10 records for topic-a/0.
//! let partition = PartitionId::new("topic-a", 0);
//! let first_sequence = session.sequence_number(&partition)?;
//! session.increment_sequence(&partition, 10)?;
//! assert_eq!(first_sequence, 0);
//! # Ok(())
//! # }
//! ```
//!
//! Transport, request encoding, batching and retry policy all live outside
//! this crate; the session only stores the outcome of the handshake and the
//! counters derived from successful sends.

#![forbid(unsafe_code)]

pub mod error;
pub mod session;
pub mod telemetry;
pub mod types;

pub mod prelude {
    //! Convenience re-exports for producer implementations.
    pub use crate::error::{Error, Result};
    pub use crate::session::ProducerSession;
    pub use crate::types::{PartitionId, ProducerEpoch, ProducerId, ProducerIdentity};
}
