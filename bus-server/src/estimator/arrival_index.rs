//! Lookup from stop code to its usable arrival sample.
//!
//! Samples without an ETA are dropped on the way in, so every entry in the
//! index carries a number. An empty index simply means there is no live
//! service data right now.

use std::collections::HashMap;

use crate::domain::{ArrivalSample, StopCode};

/// Index of usable arrival samples, keyed by stop code.
#[derive(Debug, Default)]
pub struct ArrivalIndex {
    samples: HashMap<StopCode, ArrivalSample>,
}

impl ArrivalIndex {
    /// Build the index from samples in the order the caller supplied them.
    ///
    /// When several usable samples share a stop code the last one wins.
    pub fn from_samples<'a>(samples: impl IntoIterator<Item = &'a ArrivalSample>) -> Self {
        let mut index = HashMap::new();

        for sample in samples {
            if sample.eta_minutes.is_none() {
                continue;
            }
            index.insert(sample.stop_code.clone(), sample.clone());
        }

        Self { samples: index }
    }

    /// Get the usable sample for a stop code.
    pub fn get(&self, code: &StopCode) -> Option<&ArrivalSample> {
        self.samples.get(code)
    }

    /// Get the ETA in minutes for a stop code.
    pub fn eta_for(&self, code: &StopCode) -> Option<i32> {
        self.samples.get(code).and_then(|s| s.eta_minutes)
    }

    /// Number of stop codes with a usable sample.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
