//! Inhabitants tagged by owning player
//!
//! Population is a collection rather than a count so planets can hold
//! citizens of several players at once. Inhabitants without an owner are
//! natives of the planet.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inhabitant {
    pub owner: Option<PlayerId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Population {
    inhabitants: Vec<Inhabitant>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// `count` natives with no owning player
    pub fn unowned(count: u32) -> Self {
        let mut population = Self::new();
        population.add(None, count);
        population
    }

    pub fn len(&self) -> u32 {
        self.inhabitants.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.inhabitants.is_empty()
    }

    pub fn inhabitants(&self) -> &[Inhabitant] {
        &self.inhabitants
    }

    pub fn count_for(&self, owner: Option<PlayerId>) -> u32 {
        self.inhabitants.iter().filter(|i| i.owner == owner).count() as u32
    }

    /// Head count per group, natives (`None`) first then players ascending
    pub fn distribution(&self) -> BTreeMap<Option<PlayerId>, u32> {
        let mut groups = BTreeMap::new();
        for inhabitant in &self.inhabitants {
            *groups.entry(inhabitant.owner).or_insert(0) += 1;
        }
        groups
    }

    /// Share of the population belonging to `player`
    pub fn fraction(&self, player: PlayerId) -> f32 {
        if self.inhabitants.is_empty() {
            return 0.0;
        }
        self.count_for(Some(player)) as f32 / self.inhabitants.len() as f32
    }

    /// Player holding strictly more inhabitants than any other player
    ///
    /// Natives never own a planet and are ignored here.
    pub fn majority_player(&self) -> Option<PlayerId> {
        let mut counts: Vec<(PlayerId, u32)> = self
            .distribution()
            .into_iter()
            .filter_map(|(owner, count)| owner.map(|p| (p, count)))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        match counts.as_slice() {
            [] => None,
            [(only, _)] => Some(*only),
            [(first, top), (_, second), ..] if top > second => Some(*first),
            _ => None,
        }
    }

    pub fn add(&mut self, owner: Option<PlayerId>, count: u32) {
        self.inhabitants
            .extend(std::iter::repeat(Inhabitant { owner }).take(count as usize));
    }

    /// Remove up to `count` inhabitants of `owner`; returns how many left
    pub fn remove(&mut self, owner: Option<PlayerId>, count: u32) -> u32 {
        let mut removed = 0;
        while removed < count {
            match self.inhabitants.iter().rposition(|i| i.owner == owner) {
                Some(idx) => {
                    self.inhabitants.remove(idx);
                    removed += 1;
                }
                None => break,
            }
        }
        removed
    }

    /// Hand every inhabitant to `player`
    pub fn assign_all(&mut self, player: PlayerId) {
        for inhabitant in &mut self.inhabitants {
            inhabitant.owner = Some(player);
        }
    }

    pub fn clear(&mut self) {
        self.inhabitants.clear();
    }

    /// Pick a group with probability proportional to its head count
    ///
    /// Returns `None` for an empty population.
    pub fn pick_weighted<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Option<PlayerId>> {
        let distribution = self.distribution();
        if distribution.len() == 1 {
            return distribution.keys().next().copied();
        }
        let total: u32 = distribution.values().sum();
        if total == 0 {
            return None;
        }
        let mut roll = rng.gen_range(0..total);
        for (owner, count) in distribution {
            if roll < count {
                return Some(owner);
            }
            roll -= count;
        }
        None
    }
}
