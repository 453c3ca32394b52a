use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of threads an account may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quota(usize);

impl Quota {
    pub fn new(limit: usize) -> Self {
        Self(limit)
    }

    /// Step function over the subscription tier
    ///
    /// A missing or zero tier gets the single-thread allowance.
    pub fn for_tier(tier: Option<u32>) -> Self {
        let limit = match tier.unwrap_or(0) {
            t if t >= 9 => 20,
            7..=8 => 10,
            5..=6 => 5,
            3..=4 => 3,
            _ => 1,
        };
        Self(limit)
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Whether one more thread fits under the limit
    pub fn allows_another(self, count: usize) -> bool {
        count < self.0
    }

    pub fn is_exceeded_by(self, count: usize) -> bool {
        count > self.0
    }
}

impl Default for Quota {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
