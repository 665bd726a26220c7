//! Score matrix and greedy assignment
//!
//! Each row is a supplier with candidate targets sorted by `cost - surplus`.
//! Assignment repeatedly takes the lowest-scoring head of any row, retires
//! that supplier and strikes the chosen target from every other row. This
//! is not an optimal assignment; it runs every turn and corrects itself.

use ordered_float::OrderedFloat;

use crate::core::types::PlanetId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub target: PlanetId,
    pub cost: f32,
    pub surplus: f32,
}

impl Candidate {
    pub fn score(&self) -> f32 {
        self.cost - self.surplus
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    /// Row key the match was made for
    pub origin: PlanetId,
    pub target: PlanetId,
    pub cost: f32,
    /// Position of the row in insertion order
    pub row: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ScoreMatrix {
    rows: Vec<(PlanetId, Vec<Candidate>)>,
}

impl ScoreMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a supplier row; rows without candidates are dropped
    pub fn add_row(&mut self, origin: PlanetId, mut candidates: Vec<Candidate>) {
        if candidates.is_empty() {
            return;
        }
        candidates.sort_by_key(|c| OrderedFloat(c.score()));
        self.rows.push((origin, candidates));
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Greedy pairing; earlier rows win ties
    pub fn assign(self) -> Vec<Assignment> {
        let mut rows: Vec<Option<(PlanetId, Vec<Candidate>)>> =
            self.rows.into_iter().map(Some).collect();
        let mut assignments = Vec::new();

        loop {
            let best = rows
                .iter()
                .enumerate()
                .filter_map(|(i, row)| {
                    let (origin, candidates) = row.as_ref()?;
                    candidates.first().map(|c| (i, *origin, *c))
                })
                .min_by_key(|(i, _, c)| (OrderedFloat(c.score()), *i));

            let Some((row, origin, chosen)) = best else {
                break;
            };

            assignments.push(Assignment {
                origin,
                target: chosen.target,
                cost: chosen.cost,
                row,
            });
            rows[row] = None;
            for (_, candidates) in rows.iter_mut().flatten() {
                candidates.retain(|c| c.target != chosen.target);
            }
        }

        assignments
    }
}
