//! Fork-choice weight attached to every stored block.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A totally-ordered fork-choice score.
///
/// Weight is caller-supplied and opaque to the store: it is persisted with
/// the block record and returned on read, never computed or compared here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Weight(u64);

impl Weight {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
