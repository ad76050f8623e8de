//! Construction-time settings for [`HashIndex`](crate::HashIndex).

use crate::error::{IndexError, Result};

/// Settings fixed for the lifetime of an index. There is no rehash path, so
/// the capacity chosen here never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    pub capacity: usize,
}

impl IndexConfig {
    /// A prime, to spread the polynomial hash across buckets.
    pub const DEFAULT_CAPACITY: usize = 151;

    pub const fn new() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
        }
    }

    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(IndexError::ZeroCapacity);
        }
        Ok(())
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_is_151() {
        assert_eq!(IndexConfig::default().capacity, 151);
        assert!(IndexConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_capacity_rejected() {
        let cfg = IndexConfig::new().with_capacity(0);
        assert_eq!(cfg.validate(), Err(IndexError::ZeroCapacity));
        assert!(IndexConfig::new().with_capacity(1).validate().is_ok());
    }
}
