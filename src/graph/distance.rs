//! Precomputed shortest-path costs between every pair of planets
//!
//! Built once at map initialization by searching every unordered pair.
//! That is O(n²) searches, acceptable because boards are small and the
//! index never changes afterwards.

use ahash::AHashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::network::{ConnectionGraph, Path};
use crate::core::types::PlanetId;

/// How one planet reaches another
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceEntry {
    pub cost: f32,
    pub node_count: usize,
    /// Index into the shared path list
    pub path_index: usize,
    /// The stored path runs from the other planet to this one
    pub reversed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistanceIndex {
    paths: Vec<Path>,
    entries: Vec<AHashMap<PlanetId, DistanceEntry>>,
}

impl DistanceIndex {
    /// Search every unordered pair; runs the searches on the rayon pool once
    /// the board has at least `parallel_threshold` planets
    pub fn build(graph: &ConnectionGraph, parallel_threshold: usize) -> Self {
        let count = graph.len();
        let pairs: Vec<(PlanetId, PlanetId)> = (0..count)
            .flat_map(|a| ((a + 1)..count).map(move |b| (PlanetId(a as u32), PlanetId(b as u32))))
            .collect();

        let found: Vec<Path> = if count >= parallel_threshold {
            pairs
                .par_iter()
                .map(|&(a, b)| graph.find_path(a, b))
                .collect()
        } else {
            pairs.iter().map(|&(a, b)| graph.find_path(a, b)).collect()
        };

        let mut index = Self {
            paths: Vec::new(),
            entries: vec![AHashMap::new(); count],
        };

        for ((a, b), path) in pairs.into_iter().zip(found) {
            if !path.is_reachable() {
                continue;
            }
            let path_index = index.paths.len();
            let entry = DistanceEntry {
                cost: path.cost,
                node_count: path.node_count(),
                path_index,
                reversed: false,
            };
            index.entries[a.index()].insert(b, entry);
            index.entries[b.index()].insert(
                a,
                DistanceEntry {
                    reversed: true,
                    ..entry
                },
            );
            index.paths.push(path);
        }

        tracing::debug!(
            "Distance index built: {} planets, {} reachable pairs",
            count,
            index.paths.len()
        );

        index
    }

    /// Distance entry from `from` to `to`; `None` when unreachable or equal
    pub fn entry(&self, from: PlanetId, to: PlanetId) -> Option<&DistanceEntry> {
        self.entries.get(from.index())?.get(&to)
    }

    /// Every planet reachable from `from`
    pub fn reachable_from(&self, from: PlanetId) -> impl Iterator<Item = (PlanetId, &DistanceEntry)> {
        self.entries
            .get(from.index())
            .into_iter()
            .flat_map(|m| m.iter().map(|(id, e)| (*id, e)))
    }

    /// Route from `from` to `to`, oriented in travel direction
    pub fn route(&self, from: PlanetId, to: PlanetId) -> Option<Vec<PlanetId>> {
        let entry = self.entry(from, to)?;
        let mut nodes = self.paths[entry.path_index].nodes.clone();
        if entry.reversed {
            nodes.reverse();
        }
        Some(nodes)
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;

    fn graph() -> ConnectionGraph {
        ConnectionGraph::build(
            vec![
                ("A", Vec2::new(0.0, 0.0)),
                ("B", Vec2::new(300.0, 0.0)),
                ("C", Vec2::new(600.0, 0.0)),
                ("Island", Vec2::new(0.0, 5000.0)),
            ],
            400.0,
        )
    }

    #[test]
    fn test_entries_are_mirrored() {
        let graph = graph();
        let index = DistanceIndex::build(&graph, usize::MAX);
        let a = graph.id_of("A").unwrap();
        let c = graph.id_of("C").unwrap();

        let forward = index.entry(a, c).unwrap();
        let backward = index.entry(c, a).unwrap();
        assert_eq!(forward.cost, backward.cost);
        assert_eq!(forward.node_count, 3);
        assert_eq!(forward.path_index, backward.path_index);
        assert!(!forward.reversed);
        assert!(backward.reversed);
    }

    #[test]
    fn test_route_orientation() {
        let graph = graph();
        let index = DistanceIndex::build(&graph, usize::MAX);
        let a = graph.id_of("A").unwrap();
        let c = graph.id_of("C").unwrap();
        let route = index.route(c, a).unwrap();
        assert_eq!(route.first(), Some(&c));
        assert_eq!(route.last(), Some(&a));
    }

    #[test]
    fn test_unreachable_pairs_are_absent() {
        let graph = graph();
        let index = DistanceIndex::build(&graph, usize::MAX);
        let a = graph.id_of("A").unwrap();
        let island = graph.id_of("Island").unwrap();
        assert!(index.entry(a, island).is_none());
        assert_eq!(index.reachable_from(island).count(), 0);
        assert_eq!(index.reachable_from(a).count(), 2);
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let graph = graph();
        let sequential = DistanceIndex::build(&graph, usize::MAX);
        let parallel = DistanceIndex::build(&graph, 0);
        assert_eq!(sequential.paths(), parallel.paths());
    }
}
