//! Type-safe wrappers for producer protocol primitives.
//!
//! These newtypes prevent mixing up integer values that share an underlying
//! representation but carry different semantic meanings (a producer id is an
//! `i64`, and so is an offset — they must never be interchangeable).

use std::fmt;

/// A producer id for idempotent/transactional producers.
///
/// Producer ids are 64-bit signed integers assigned by the broker during the
/// identity handshake. `-1` means "not yet assigned".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProducerId(pub i64);

impl ProducerId {
    /// Invalid/unassigned producer id.
    pub const INVALID: Self = ProducerId(-1);

    /// Create a new producer id from a raw value.
    #[inline]
    pub const fn new(value: i64) -> Self {
        ProducerId(value)
    }

    /// Get the raw i64 value.
    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Check if this is a valid (non-negative) producer id.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl From<i64> for ProducerId {
    fn from(value: i64) -> Self {
        ProducerId(value)
    }
}

impl From<ProducerId> for i64 {
    fn from(id: ProducerId) -> Self {
        id.0
    }
}

impl fmt::Display for ProducerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A producer epoch for idempotent/transactional producers.
///
/// Epochs are 16-bit signed integers that increment each time the broker
/// re-issues an identity; a newer epoch fences in-flight writes from a prior
/// incarnation of the same producer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ProducerEpoch(pub i16);

impl ProducerEpoch {
    /// Invalid/unknown producer epoch.
    pub const INVALID: Self = ProducerEpoch(-1);

    /// Create a new producer epoch from a raw value.
    #[inline]
    pub const fn new(value: i16) -> Self {
        ProducerEpoch(value)
    }

    /// Get the raw i16 value.
    #[inline]
    pub const fn value(self) -> i16 {
        self.0
    }
}

impl From<i16> for ProducerEpoch {
    fn from(value: i16) -> Self {
        ProducerEpoch(value)
    }
}

impl From<ProducerEpoch> for i16 {
    fn from(epoch: ProducerEpoch) -> Self {
        epoch.0
    }
}

impl fmt::Display for ProducerEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A broker-assigned producer identity: id plus epoch.
///
/// This is the immutable snapshot handed to application callers by
/// [`ProducerSession`](crate::session::ProducerSession). The epoch is only
/// meaningful while [`is_valid`](Self::is_valid) returns true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProducerIdentity {
    /// The broker-assigned producer id.
    pub id: ProducerId,
    /// The generation counter paired with the id.
    pub epoch: ProducerEpoch,
}

impl ProducerIdentity {
    /// The unassigned identity every session starts from.
    pub const NONE: Self = ProducerIdentity {
        id: ProducerId::INVALID,
        epoch: ProducerEpoch(0),
    };

    /// Create an identity from an id and epoch.
    #[inline]
    pub const fn new(id: ProducerId, epoch: ProducerEpoch) -> Self {
        ProducerIdentity { id, epoch }
    }

    /// Check whether the broker has assigned this identity.
    ///
    /// Callers of `await_identity` must check this on the returned snapshot:
    /// an invalid identity is how a timeout is signalled.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.id.is_valid()
    }
}

impl Default for ProducerIdentity {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for ProducerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(id={}, epoch={})", self.id, self.epoch)
    }
}

/// A topic-partition identifier.
///
/// Identifies the destination a sequence counter is tracked for, replacing
/// the loose `(String, i32)` tuple pattern.
///
/// # Usage
///
/// ```
/// use sequent::types::PartitionId;
///
/// let partition = PartitionId::new("my-topic", 0);
/// assert_eq!(partition.to_string(), "my-topic-0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartitionId {
    /// The topic name.
    topic: String,
    /// The partition index.
    partition: i32,
}

impl PartitionId {
    /// Create a new partition identifier.
    #[inline]
    pub fn new(topic: impl Into<String>, partition: i32) -> Self {
        Self {
            topic: topic.into(),
            partition,
        }
    }

    /// Get the topic name.
    #[inline]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Get the partition index.
    #[inline]
    pub fn partition(&self) -> i32 {
        self.partition
    }
}

impl From<(String, i32)> for PartitionId {
    fn from((topic, partition): (String, i32)) -> Self {
        Self { topic, partition }
    }
}

impl From<(&str, i32)> for PartitionId {
    fn from((topic, partition): (&str, i32)) -> Self {
        Self {
            topic: topic.to_string(),
            partition,
        }
    }
}

impl From<PartitionId> for (String, i32) {
    fn from(id: PartitionId) -> Self {
        (id.topic, id.partition)
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.topic, self.partition)
    }
}
