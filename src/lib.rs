//! GenreMiner: A Rust CLI application for genre recommendations using
//! Apriori association-rule mining
//!
//! This library mines co-occurrence patterns in library borrowing events
//! (sets of genre tags per transaction), derives association rules with
//! confidence/lift filtering, scores ranked recommendations against a user
//! profile, and evaluates recommendation quality on held-out transactions.

pub mod cli;
pub mod data;
pub mod eval;
pub mod itemset;
pub mod miner;
pub mod recommend;
pub mod rules;
pub mod viz;

// Re-export public items for easier access
pub use cli::Args;
pub use data::{
    default_genre_vocabulary, load_borrow_events, normalize_transactions, BorrowRecord,
};
pub use eval::{evaluate, EvaluationReport};
pub use itemset::Itemset;
pub use miner::{mine_frequent_itemsets, support_of, FrequentItemsets};
pub use recommend::{recommend, Recommendation};
pub use rules::{generate_rules, to_records, AssociationRule, RuleRecord};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
