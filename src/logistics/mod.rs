//! Logistics: pairing surplus with shortage across the connection graph

pub mod matcher;
pub mod score;

pub use matcher::{
    collect_research, is_colonization_target, match_colonizers, match_food, match_goods,
    plan_turn, AiStrategy, MatchContext, Player,
};
pub use score::{Assignment, Candidate, ScoreMatrix};
