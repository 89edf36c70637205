//! Operator identities and the sequences that hand them out.
//!
//! Ids are unique for the lifetime of a sequence. The process-wide sequence
//! starts at 1 and is never reset; tests and embedders that need determinism
//! inject their own `AtomicIdSequence`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};

macro_rules! new_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(v: u64) -> Self {
                Self(v)
            }
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "#{}", self.0)
            }
        }
    };
}

new_id!(OperatorId);

/// Source of fresh operator ids.
///
/// Implementations must never return the same id twice and must return ids in
/// strictly increasing order.
pub trait IdSequence: Send + Sync {
    /// Consume and return the next id. Fails with `IdsExhausted` instead of
    /// wrapping once the counter reaches `u64::MAX`.
    fn next_id(&self) -> Result<OperatorId>;

    /// The id the next call to `next_id` will return.
    fn peek(&self) -> OperatorId;

    /// Make sure ids handed out from now on are greater than `id`.
    /// Used when operators with previously assigned ids are rehydrated.
    fn advance_past(&self, id: OperatorId);
}

/// Lock-free counter; safe to share between threads.
#[derive(Debug)]
pub struct AtomicIdSequence {
    next: AtomicU64,
}

impl AtomicIdSequence {
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for AtomicIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSequence for AtomicIdSequence {
    fn next_id(&self) -> Result<OperatorId> {
        self.next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
            .map(OperatorId)
            .map_err(|_| Error::IdsExhausted)
    }

    fn peek(&self) -> OperatorId {
        OperatorId(self.next.load(Ordering::Relaxed))
    }

    fn advance_past(&self, id: OperatorId) {
        self.next
            .fetch_max(id.get().saturating_add(1), Ordering::Relaxed);
    }
}

static GLOBAL_SEQUENCE: AtomicIdSequence = AtomicIdSequence::new();

/// Handle to the process-wide sequence. All handles share one counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalIdSequence;

impl IdSequence for GlobalIdSequence {
    fn next_id(&self) -> Result<OperatorId> {
        GLOBAL_SEQUENCE.next_id()
    }

    fn peek(&self) -> OperatorId {
        GLOBAL_SEQUENCE.peek()
    }

    fn advance_past(&self, id: OperatorId) {
        GLOBAL_SEQUENCE.advance_past(id)
    }
}
