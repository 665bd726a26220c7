//! Connection graph - proximity network between planets
//!
//! Locations are stored in an arena addressed by `PlanetId`; the graph is
//! built once and never mutated afterwards.

use ahash::AHashMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::core::error::{EconomyError, Result};
use crate::core::types::{PlanetId, Vec2};

/// An undirected edge as seen from one endpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub to: PlanetId,
    pub cost: f32,
}

/// A node of the connection graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub position: Vec2,
    pub connections: Vec<Connection>,
}

/// A route between two locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Sum of edge costs; infinite when the destination is unreachable
    pub cost: f32,
    /// Locations from origin to destination, empty when unreachable
    pub nodes: Vec<PlanetId>,
}

impl Path {
    /// The "no path" result for disconnected locations
    pub fn unreachable() -> Self {
        Self {
            cost: f32::INFINITY,
            nodes: Vec::new(),
        }
    }

    pub fn is_reachable(&self) -> bool {
        !self.nodes.is_empty() && self.cost.is_finite()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn origin(&self) -> Option<PlanetId> {
        self.nodes.first().copied()
    }

    pub fn destination(&self) -> Option<PlanetId> {
        self.nodes.last().copied()
    }
}

/// Undirected weighted graph over a fixed set of named locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionGraph {
    locations: Vec<Location>,
    by_name: AHashMap<String, PlanetId>,
}

impl ConnectionGraph {
    /// Build the graph, connecting every pair closer than `max_distance`
    ///
    /// Ids are assigned in input order.
    pub fn build<I, S>(points: I, max_distance: f32) -> Self
    where
        I: IntoIterator<Item = (S, Vec2)>,
        S: Into<String>,
    {
        let mut graph = Self::default();
        for (name, position) in points {
            let id = PlanetId(graph.locations.len() as u32);
            let name = name.into();
            graph.by_name.insert(name.clone(), id);
            graph.locations.push(Location {
                name,
                position,
                connections: Vec::new(),
            });
        }

        let count = graph.locations.len();
        for a in 0..count {
            for b in (a + 1)..count {
                let distance = graph.locations[a]
                    .position
                    .distance(&graph.locations[b].position);
                if distance <= max_distance {
                    graph.locations[a].connections.push(Connection {
                        to: PlanetId(b as u32),
                        cost: distance,
                    });
                    graph.locations[b].connections.push(Connection {
                        to: PlanetId(a as u32),
                        cost: distance,
                    });
                }
            }
        }

        graph
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn location(&self, id: PlanetId) -> &Location {
        &self.locations[id.index()]
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn id_of(&self, name: &str) -> Result<PlanetId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| EconomyError::UnknownPlanet(name.to_string()))
    }

    /// Direct edge cost between two locations, if connected
    pub fn edge_cost(&self, a: PlanetId, b: PlanetId) -> Option<f32> {
        self.location(a)
            .connections
            .iter()
            .find(|c| c.to == b)
            .map(|c| c.cost)
    }

    /// Every undirected edge once, as (lower id, higher id, cost)
    pub fn edges(&self) -> impl Iterator<Item = (PlanetId, PlanetId, f32)> + '_ {
        self.locations.iter().enumerate().flat_map(|(i, loc)| {
            loc.connections
                .iter()
                .filter(move |c| c.to.index() > i)
                .map(move |c| (PlanetId(i as u32), c.to, c.cost))
        })
    }

    /// Name-based convenience over `find_path`
    pub fn find_path_by_name(&self, origin: &str, destination: &str) -> Result<Path> {
        Ok(self.find_path(self.id_of(origin)?, self.id_of(destination)?))
    }

    /// Informed search from `origin` to `destination`
    ///
    /// Heuristic is straight-line distance to the destination (zero at both
    /// endpoints). The search stops as soon as the destination is relaxed,
    /// not when it is popped, so the route is not guaranteed optimal beyond
    /// the first hop. Frontier ties resolve in insertion order.
    pub fn find_path(&self, origin: PlanetId, destination: PlanetId) -> Path {
        if origin == destination {
            return Path {
                cost: 0.0,
                nodes: vec![origin],
            };
        }

        let count = self.locations.len();
        let target = self.locations[destination.index()].position;
        let heuristic: Vec<f32> = self
            .locations
            .iter()
            .enumerate()
            .map(|(i, loc)| {
                if i == origin.index() || i == destination.index() {
                    0.0
                } else {
                    loc.position.distance(&target)
                }
            })
            .collect();

        let mut g_score = vec![0.0_f32; count];
        let mut parent: Vec<Option<PlanetId>> = vec![None; count];
        let mut open_f: Vec<Option<f32>> = vec![None; count];
        let mut closed_f: Vec<Option<f32>> = vec![None; count];

        // (f, insertion sequence, node); Reverse turns the max-heap into a min-heap
        let mut open_set = BinaryHeap::new();
        let mut sequence: u64 = 0;
        open_set.push(Reverse((OrderedFloat(0.0_f32), sequence, origin)));
        open_f[origin.index()] = Some(0.0);

        let mut found = false;
        'search: while let Some(Reverse((OrderedFloat(f), _, current))) = open_set.pop() {
            // Stale heap entry superseded by a better one
            if open_f[current.index()] != Some(f) {
                continue;
            }
            open_f[current.index()] = None;

            for connection in &self.locations[current.index()].connections {
                let neighbor = connection.to;
                let tentative_g = g_score[current.index()] + connection.cost;
                let tentative_f = tentative_g + heuristic[neighbor.index()];

                if neighbor == destination {
                    parent[neighbor.index()] = Some(current);
                    g_score[neighbor.index()] = tentative_g;
                    found = true;
                    break 'search;
                }

                if matches!(closed_f[neighbor.index()], Some(closed) if closed <= tentative_f) {
                    continue;
                }
                if matches!(open_f[neighbor.index()], Some(open) if open <= tentative_f) {
                    continue;
                }

                g_score[neighbor.index()] = tentative_g;
                parent[neighbor.index()] = Some(current);
                closed_f[neighbor.index()] = None;
                open_f[neighbor.index()] = Some(tentative_f);
                sequence += 1;
                open_set.push(Reverse((OrderedFloat(tentative_f), sequence, neighbor)));
            }

            closed_f[current.index()] = Some(f);
        }

        if !found {
            return Path::unreachable();
        }

        let mut nodes = vec![destination];
        let mut node = destination;
        while let Some(prev) = parent[node.index()] {
            nodes.push(prev);
            node = prev;
        }
        nodes.reverse();

        Path {
            cost: g_score[destination.index()],
            nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_graph() -> ConnectionGraph {
        // A - B - C - D spaced 300 apart; only neighbours connect
        ConnectionGraph::build(
            vec![
                ("A", Vec2::new(0.0, 0.0)),
                ("B", Vec2::new(300.0, 0.0)),
                ("C", Vec2::new(600.0, 0.0)),
                ("D", Vec2::new(900.0, 0.0)),
            ],
            400.0,
        )
    }

    #[test]
    fn test_edges_are_symmetric() {
        let graph = line_graph();
        for (a, b, cost) in graph.edges() {
            assert_eq!(graph.edge_cost(a, b), Some(cost));
            assert_eq!(graph.edge_cost(b, a), Some(cost));
        }
        assert_eq!(graph.edges().count(), 3);
    }

    #[test]
    fn test_no_edge_beyond_max_distance() {
        let graph = line_graph();
        let a = graph.id_of("A").unwrap();
        let c = graph.id_of("C").unwrap();
        assert_eq!(graph.edge_cost(a, c), None);
    }

    #[test]
    fn test_path_along_line() {
        let graph = line_graph();
        let path = graph.find_path_by_name("A", "D").unwrap();
        assert!(path.is_reachable());
        assert_eq!(path.node_count(), 4);
        assert_eq!(path.origin(), Some(graph.id_of("A").unwrap()));
        assert_eq!(path.destination(), Some(graph.id_of("D").unwrap()));
        assert!((path.cost - 900.0).abs() < 1e-3);
    }

    #[test]
    fn test_direct_neighbour_uses_edge() {
        let graph = ConnectionGraph::build(
            vec![
                ("A", Vec2::new(0.0, 0.0)),
                ("B", Vec2::new(100.0, 0.0)),
                ("C", Vec2::new(50.0, 10.0)),
            ],
            400.0,
        );
        let path = graph.find_path_by_name("A", "B").unwrap();
        assert_eq!(path.node_count(), 2);
        assert!((path.cost - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_same_location() {
        let graph = line_graph();
        let b = graph.id_of("B").unwrap();
        let path = graph.find_path(b, b);
        assert_eq!(path.nodes, vec![b]);
        assert_eq!(path.cost, 0.0);
    }

    #[test]
    fn test_unreachable_is_sentinel() {
        let graph = ConnectionGraph::build(
            vec![("A", Vec2::new(0.0, 0.0)), ("Far", Vec2::new(5000.0, 0.0))],
            400.0,
        );
        let path = graph.find_path_by_name("A", "Far").unwrap();
        assert!(!path.is_reachable());
        assert!(path.cost.is_infinite());
        assert_eq!(path.node_count(), 0);
    }

    #[test]
    fn test_unknown_name_is_error() {
        let graph = line_graph();
        assert!(matches!(
            graph.find_path_by_name("A", "Nowhere"),
            Err(EconomyError::UnknownPlanet(_))
        ));
    }

    #[test]
    fn test_detour_around_gap() {
        // A and C are too far apart; both reach B
        let graph = ConnectionGraph::build(
            vec![
                ("A", Vec2::new(0.0, 0.0)),
                ("B", Vec2::new(250.0, 250.0)),
                ("C", Vec2::new(500.0, 0.0)),
            ],
            400.0,
        );
        let path = graph.find_path_by_name("A", "C").unwrap();
        let names: Vec<_> = path
            .nodes
            .iter()
            .map(|id| graph.location(*id).name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
