//! Crate-level errors.
//!
//! The session has a deliberately small failure surface:
//!
//! - Timing out in [`await_identity`] is NOT an error. The call returns an
//!   invalid [`ProducerIdentity`] snapshot and the caller branches on
//!   [`is_valid`].
//! - Cancellation is the async-native kind: dropping the `await_identity`
//!   future abandons the wait without producing a value, so it can never be
//!   confused with a timeout.
//! - Touching the sequence ledger while idempotence is disabled is a caller
//!   contract violation and surfaces as [`Error::IdempotenceDisabled`].
//!
//! Irrecoverable broker errors are classified upstream by the background
//! coordinator; this crate only executes the resulting `reset()`.
//!
//! [`await_identity`]: crate::session::ProducerSession::await_identity
//! [`ProducerIdentity`]: crate::types::ProducerIdentity
//! [`is_valid`]: crate::types::ProducerIdentity::is_valid

use std::result;
use thiserror::Error as ThisError;

pub type Result<T> = result::Result<T, Error>;

/// Errors reported by the producer session.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum Error {
    /// The sequence ledger was accessed on a session constructed with
    /// idempotence disabled. This indicates producer misconfiguration, not
    /// recoverable runtime state.
    #[error("sequence numbers are not tracked when idempotence is disabled")]
    IdempotenceDisabled,
}
