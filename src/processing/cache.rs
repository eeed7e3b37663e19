use std::collections::HashMap;
use std::sync::Arc;

use crate::algorithms::lut::TdoaLut;
use crate::core::types::{AngleUnit, ArrayParameters};

/// Exact `(fs, d, c)` bit patterns plus the angle unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct LutKey {
    bits: (u64, u64, u64),
    unit: AngleUnit,
}

impl LutKey {
    fn new(parameters: &ArrayParameters, unit: AngleUnit) -> Self {
        Self {
            bits: parameters.key_bits(),
            unit,
        }
    }
}

/// Cache of lookup tables so repeated estimates against the same array reuse one table
#[derive(Debug, Default)]
pub struct LutCache {
    tables: HashMap<LutKey, Arc<TdoaLut>>,
    /// Cache hit count for statistics
    hit_count: usize,
    /// Cache miss count for statistics
    miss_count: usize,
}

impl LutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table for `parameters`, building it on first use.
    ///
    /// Keys compare the parameters bit for bit, so a table is never served for
    /// a triple that merely rounds to the same value.
    pub fn get_or_build(&mut self, parameters: &ArrayParameters, unit: AngleUnit) -> Arc<TdoaLut> {
        let key = LutKey::new(parameters, unit);
        if let Some(table) = self.tables.get(&key) {
            self.hit_count += 1;
            return Arc::clone(table);
        }

        self.miss_count += 1;
        let table = Arc::new(TdoaLut::build(*parameters, unit));
        self.tables.insert(key, Arc::clone(&table));
        table
    }

    /// Table for `parameters` if it has already been built
    pub fn get(&self, parameters: &ArrayParameters, unit: AngleUnit) -> Option<Arc<TdoaLut>> {
        self.tables.get(&LutKey::new(parameters, unit)).cloned()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Get cache statistics as (hits, misses, hit rate)
    pub fn get_statistics(&self) -> (usize, usize, f64) {
        let total = self.hit_count + self.miss_count;
        let hit_rate = if total > 0 {
            self.hit_count as f64 / total as f64
        } else {
            0.0
        };

        (self.hit_count, self.miss_count, hit_rate)
    }

    /// Clear all tables
    pub fn clear(&mut self) {
        self.tables.clear();
    }
}
