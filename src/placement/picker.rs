//! Cloud pickers.

use rand::RngCore;
use rand::seq::IndexedRandom;

use crate::ga::CloudPicker;

/// Picks every candidate with equal probability.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformCloudPicker;

impl CloudPicker for UniformCloudPicker {
    fn pick(&self, candidates: &[&str], rng: &mut dyn RngCore) -> Option<String> {
        candidates.choose(rng).map(|c| c.to_string())
    }
}
