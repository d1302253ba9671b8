//! Cloud model.
//!
//! A cloud is a candidate hosting site for applications. Besides its
//! capacity it carries the network state towards the other clouds and an
//! optional ambient temperature used for energy cost estimation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Amount of compute resources, either offered (cloud capacity) or
/// requested (application demand).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    /// Logical CPU cores.
    pub cpu_cores: f64,
    /// Memory in MiB.
    pub memory_mi: f64,
    /// Storage in GiB.
    pub storage_gi: f64,
}

impl Resources {
    /// Creates a resource vector.
    pub fn new(cpu_cores: f64, memory_mi: f64, storage_gi: f64) -> Self {
        Self {
            cpu_cores,
            memory_mi,
            storage_gi,
        }
    }

    /// CPU-only resource vector.
    pub fn cpu(cpu_cores: f64) -> Self {
        Self::new(cpu_cores, 0.0, 0.0)
    }

    /// Whether `demand` fits into `self` on every dimension.
    pub fn fits(&self, demand: &Resources) -> bool {
        demand.cpu_cores <= self.cpu_cores
            && demand.memory_mi <= self.memory_mi
            && demand.storage_gi <= self.storage_gi
    }

    /// Subtracts `demand` in place.
    pub fn consume(&mut self, demand: &Resources) {
        self.cpu_cores -= demand.cpu_cores;
        self.memory_mi -= demand.memory_mi;
        self.storage_gi -= demand.storage_gi;
    }
}

/// Network state from one cloud towards another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetState {
    /// Round-trip time (ms).
    pub rtt_ms: f64,
}

/// A cloud that can host applications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    /// Unique cloud identifier.
    pub id: String,
    /// Network state towards other clouds (cloud ID → state).
    pub net_state: BTreeMap<String, NetState>,
    /// Ambient temperature (°C). `None` or non-positive = unknown.
    pub temperature_c: Option<f64>,
    /// Total capacity available to scheduled applications.
    pub capacity: Resources,
}

impl Cloud {
    /// Creates a cloud with no capacity and unknown temperature.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            net_state: BTreeMap::new(),
            temperature_c: None,
            capacity: Resources::default(),
        }
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: Resources) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the ambient temperature (°C).
    pub fn with_temperature(mut self, temperature_c: f64) -> Self {
        self.temperature_c = Some(temperature_c);
        self
    }

    /// Adds the round-trip time towards another cloud.
    pub fn with_rtt(mut self, other: impl Into<String>, rtt_ms: f64) -> Self {
        self.net_state.insert(other.into(), NetState { rtt_ms });
        self
    }

    /// Temperature if it is known (present and positive).
    pub fn known_temperature(&self) -> Option<f64> {
        self.temperature_c.filter(|t| *t > 0.0)
    }

    /// Round-trip time towards `other`, if measured.
    pub fn rtt_to(&self, other: &str) -> Option<f64> {
        self.net_state.get(other).map(|ns| ns.rtt_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloud_builder() {
        let c = Cloud::new("C1")
            .with_capacity(Resources::new(8.0, 16384.0, 100.0))
            .with_temperature(21.5)
            .with_rtt("C2", 12.0);

        assert_eq!(c.id, "C1");
        assert!((c.capacity.cpu_cores - 8.0).abs() < 1e-10);
        assert_eq!(c.known_temperature(), Some(21.5));
        assert_eq!(c.rtt_to("C2"), Some(12.0));
        assert_eq!(c.rtt_to("C3"), None);
    }

    #[test]
    fn test_non_positive_temperature_is_unknown() {
        assert_eq!(Cloud::new("C1").known_temperature(), None);
        assert_eq!(Cloud::new("C1").with_temperature(0.0).known_temperature(), None);
        assert_eq!(Cloud::new("C1").with_temperature(-3.0).known_temperature(), None);
    }

    #[test]
    fn test_resources_fit_and_consume() {
        let mut cap = Resources::new(4.0, 1024.0, 10.0);
        let demand = Resources::new(1.5, 512.0, 2.0);
        assert!(cap.fits(&demand));

        cap.consume(&demand);
        cap.consume(&demand);
        assert!((cap.cpu_cores - 1.0).abs() < 1e-10);
        assert!(!cap.fits(&demand));
    }
}
