//! Solution (chromosome) model.
//!
//! A solution maps every application of a request to exactly one [`Gene`].
//! Solutions are plain values: cloning produces a fully independent copy,
//! and equality compares every gene.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where and with how much CPU an accepted application runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Target cloud ID.
    pub cloud: String,
    /// Opaque node label inside the cloud. Equal labels mean co-location.
    pub node: String,
    /// Allocated CPU cores. Zero until the feasibility oracle allocates.
    pub cpu_cores: f64,
}

impl Placement {
    /// Placement on a cloud, node and CPU not yet allocated.
    pub fn on(cloud: impl Into<String>) -> Self {
        Self {
            cloud: cloud.into(),
            node: String::new(),
            cpu_cores: 0.0,
        }
    }
}

/// Decision for one application.
///
/// A rejected gene carries no cloud, node, or CPU allocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Gene {
    /// Not placed.
    #[default]
    Rejected,
    /// Placed according to the contained placement.
    Accepted(Placement),
}

impl Gene {
    /// Accepted on `cloud` with no node or CPU allocated yet.
    pub fn accepted_on(cloud: impl Into<String>) -> Self {
        Gene::Accepted(Placement::on(cloud))
    }

    /// Whether the application is accepted.
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Gene::Accepted(_))
    }

    /// The placement, if accepted.
    pub fn placement(&self) -> Option<&Placement> {
        match self {
            Gene::Accepted(p) => Some(p),
            Gene::Rejected => None,
        }
    }

    /// Target cloud, if accepted.
    pub fn cloud(&self) -> Option<&str> {
        self.placement().map(|p| p.cloud.as_str())
    }

    /// Node label, if accepted.
    pub fn node(&self) -> Option<&str> {
        self.placement().map(|p| p.node.as_str())
    }

    /// Allocated CPU cores (0 when rejected).
    pub fn cpu_cores(&self) -> f64 {
        self.placement().map_or(0.0, |p| p.cpu_cores)
    }
}

/// A complete placement decision: application ID → gene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    genes: BTreeMap<String, Gene>,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Solution rejecting every given application.
    pub fn all_rejected<'a>(app_ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            genes: app_ids
                .into_iter()
                .map(|id| (id.to_string(), Gene::Rejected))
                .collect(),
        }
    }

    /// Gene of an application.
    pub fn gene(&self, app_id: &str) -> Option<&Gene> {
        self.genes.get(app_id)
    }

    /// Sets the gene of an application, returning the previous one.
    pub fn set(&mut self, app_id: impl Into<String>, gene: Gene) -> Option<Gene> {
        self.genes.insert(app_id.into(), gene)
    }

    /// Rejects an application, returning the previous gene.
    pub fn reject(&mut self, app_id: &str) -> Option<Gene> {
        self.genes.get_mut(app_id).map(std::mem::take)
    }

    /// Iterates genes in application ID order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Gene)> {
        self.genes.iter()
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the solution has no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Whether the solution has a gene for every given application.
    pub fn covers<'a>(&self, app_ids: impl IntoIterator<Item = &'a str>) -> bool {
        app_ids.into_iter().all(|id| self.genes.contains_key(id))
    }

    /// Whether an application is accepted (false if missing).
    pub fn is_accepted(&self, app_id: &str) -> bool {
        self.gene(app_id).is_some_and(Gene::is_accepted)
    }

    /// Number of accepted applications.
    pub fn accepted_count(&self) -> usize {
        self.genes.values().filter(|g| g.is_accepted()).count()
    }

    /// IDs of applications accepted on a cloud.
    pub fn accepted_on<'a>(&'a self, cloud: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.genes
            .iter()
            .filter(move |(_, g)| g.cloud() == Some(cloud))
            .map(|(id, _)| id.as_str())
    }
}

impl FromIterator<(String, Gene)> for Solution {
    fn from_iter<I: IntoIterator<Item = (String, Gene)>>(iter: I) -> Self {
        Self {
            genes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Solution {
        let mut s = Solution::all_rejected(["A1", "A2", "A3"]);
        s.set(
            "A1",
            Gene::Accepted(Placement {
                cloud: "C1".into(),
                node: "n1".into(),
                cpu_cores: 2.0,
            }),
        );
        s.set("A3", Gene::accepted_on("C2"));
        s
    }

    #[test]
    fn test_gene_accessors() {
        let s = sample();
        let a1 = s.gene("A1").unwrap();
        assert!(a1.is_accepted());
        assert_eq!(a1.cloud(), Some("C1"));
        assert_eq!(a1.node(), Some("n1"));
        assert!((a1.cpu_cores() - 2.0).abs() < 1e-10);

        let a2 = s.gene("A2").unwrap();
        assert!(!a2.is_accepted());
        assert_eq!(a2.cloud(), None);
        assert_eq!(a2.cpu_cores(), 0.0);
    }

    #[test]
    fn test_counts_and_lookup() {
        let s = sample();
        assert_eq!(s.len(), 3);
        assert_eq!(s.accepted_count(), 2);
        assert_eq!(s.accepted_on("C1").collect::<Vec<_>>(), vec!["A1"]);
        assert!(s.covers(["A1", "A2", "A3"]));
        assert!(!s.covers(["A1", "A4"]));
        assert!(!s.is_accepted("A4"));
    }

    #[test]
    fn test_reject_clears_placement() {
        let mut s = sample();
        let prev = s.reject("A1").unwrap();
        assert!(prev.is_accepted());
        assert_eq!(s.gene("A1"), Some(&Gene::Rejected));
        assert_eq!(s.gene("A1").unwrap().cpu_cores(), 0.0);
        assert!(s.reject("A9").is_none());
    }

    #[test]
    fn test_clone_is_independent() {
        let original = sample();
        let mut copy = original.clone();
        assert_eq!(copy, original);

        copy.reject("A3");
        assert_ne!(copy, original);
        assert!(original.is_accepted("A3"));
    }

    #[test]
    fn test_rejected_gene_serializes_without_placement() {
        let json = serde_json::to_string(&Gene::Rejected).unwrap();
        assert_eq!(json, "\"Rejected\"");

        let s = sample();
        let back: Solution = serde_json::from_str(&serde_json::to_string(&s).unwrap()).unwrap();
        assert_eq!(back, s);
    }
}
