//! Growth and probing policy.

use crate::error::{Error, Result};

/// Default multiplier applied to an array's capacity when it grows.
pub const DEFAULT_GROWTH_FACTOR: f32 = 2.0;

/// Default floor for every array growth.
pub const DEFAULT_MIN_CAPACITY: usize = 16;

/// Bucket slots allocated by a map's first insert.
pub const DEFAULT_INITIAL_BUCKETS: usize = 64;

/// Multiplier applied to the bucket table when it grows.
pub const DEFAULT_BUCKET_GROWTH: usize = 4;

/// The bucket table is kept at least this many times larger than the
/// live entry count.
pub const DEFAULT_LOAD_RATIO: usize = 3;

/// Growth policy of a [`GrowableArray`](crate::GrowableArray).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ArrayConfig {
    /// Multiplier applied on growth; must be finite and greater than 1.0.
    pub growth_factor: f32,

    /// Capacity never grows to less than this.
    pub min_capacity: usize,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            growth_factor: DEFAULT_GROWTH_FACTOR,
            min_capacity: DEFAULT_MIN_CAPACITY,
        }
    }
}

impl ArrayConfig {
    /// Sets the growth factor.
    #[must_use]
    pub fn growth_factor(mut self, factor: f32) -> Self {
        self.growth_factor = factor;
        self
    }

    /// Sets the minimum capacity.
    #[must_use]
    pub fn min_capacity(mut self, n: usize) -> Self {
        self.min_capacity = n;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.growth_factor.is_finite() || self.growth_factor <= 1.0 {
            return Err(Error::invalid_config(format!(
                "growth factor must be finite and > 1.0, got {}",
                self.growth_factor
            )));
        }
        Ok(())
    }
}

/// How a probe decides that an occupied bucket holds the searched key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum KeyMatch {
    /// Equal hashes and equal key bytes.
    #[default]
    Bytes,

    /// Equal hashes only. Two distinct keys with the same hash are treated
    /// as the same key.
    HashOnly,
}

/// Bucket table policy of a [`StrHashMap`](crate::StrHashMap).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MapConfig {
    /// Bucket slots allocated on first insert.
    pub initial_buckets: usize,

    /// Multiplier applied to the bucket table on growth.
    pub bucket_growth: usize,

    /// Grow once `load_ratio * (len + 1) >= buckets`.
    pub load_ratio: usize,

    pub key_match: KeyMatch,

    /// Growth policy of the value, key and bookkeeping stores.
    pub storage: ArrayConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            initial_buckets: DEFAULT_INITIAL_BUCKETS,
            bucket_growth: DEFAULT_BUCKET_GROWTH,
            load_ratio: DEFAULT_LOAD_RATIO,
            key_match: KeyMatch::default(),
            storage: ArrayConfig::default(),
        }
    }
}

impl MapConfig {
    #[must_use]
    pub fn initial_buckets(mut self, n: usize) -> Self {
        self.initial_buckets = n;
        self
    }

    #[must_use]
    pub fn bucket_growth(mut self, factor: usize) -> Self {
        self.bucket_growth = factor;
        self
    }

    #[must_use]
    pub fn load_ratio(mut self, ratio: usize) -> Self {
        self.load_ratio = ratio;
        self
    }

    #[must_use]
    pub fn key_match(mut self, mode: KeyMatch) -> Self {
        self.key_match = mode;
        self
    }

    #[must_use]
    pub fn storage(mut self, storage: ArrayConfig) -> Self {
        self.storage = storage;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_buckets == 0 {
            return Err(Error::invalid_config("initial bucket count must be non-zero"));
        }
        if self.bucket_growth < 2 {
            return Err(Error::invalid_config(format!(
                "bucket growth must be at least 2, got {}",
                self.bucket_growth
            )));
        }
        if self.load_ratio == 0 {
            return Err(Error::invalid_config("load ratio must be non-zero"));
        }
        self.storage.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        ArrayConfig::default().validate().unwrap();
        MapConfig::default().validate().unwrap();
        assert_eq!(MapConfig::default().initial_buckets, 64);
        assert_eq!(ArrayConfig::default().min_capacity, 16);
    }

    #[test]
    fn growth_factor_must_exceed_one() {
        for bad in [1.0, 0.5, -2.0, f32::NAN, f32::INFINITY] {
            let cfg = ArrayConfig::default().growth_factor(bad);
            assert!(
                matches!(cfg.validate(), Err(Error::InvalidConfig { .. })),
                "{bad} accepted"
            );
        }
        ArrayConfig::default().growth_factor(1.5).validate().unwrap();
    }

    #[test]
    fn map_config_rejects_degenerate_tables() {
        assert!(MapConfig::default().initial_buckets(0).validate().is_err());
        assert!(MapConfig::default().bucket_growth(1).validate().is_err());
        assert!(MapConfig::default().load_ratio(0).validate().is_err());
        let bad_storage = ArrayConfig::default().growth_factor(1.0);
        assert!(MapConfig::default().storage(bad_storage).validate().is_err());
    }
}
