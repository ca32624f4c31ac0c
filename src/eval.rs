//! Held-out evaluation of the recommender against historical borrowing data

use std::collections::{BTreeMap, HashSet};

use crate::data::BorrowRecord;
use crate::itemset::Itemset;
use crate::recommend::recommend;
use crate::rules::AssociationRule;

/// Aggregate quality metrics over all evaluated users.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    /// Mean precision@top_k across evaluated users
    pub precision: f64,
    /// Mean recall across evaluated users
    pub recall: f64,
    /// Distinct recommended genres over distinct genres seen in the history
    pub coverage: f64,
    /// Users with at least two transactions
    pub users_evaluated: usize,
}

/// Hold out each user's last transaction, recommend from the union of the
/// rest, and measure how well the held-out genres were predicted.
///
/// Users with fewer than two transactions are skipped (no held-out target is
/// possible). Precision divides by the configured `top_k` even when fewer
/// recommendations come back, matching the reference behavior. If no user
/// qualifies, all metrics are reported as zero.
pub fn evaluate(
    records: &[BorrowRecord],
    rules: &[AssociationRule],
    top_k: usize,
) -> crate::Result<EvaluationReport> {
    if top_k == 0 {
        anyhow::bail!("top_k must be at least 1");
    }

    // Group by user, keeping each user's transactions in input order
    let mut by_user: BTreeMap<i64, Vec<&BorrowRecord>> = BTreeMap::new();
    for record in records {
        by_user.entry(record.user_id).or_default().push(record);
    }

    let mut precisions = Vec::new();
    let mut recalls = Vec::new();
    let mut recommended_genres: HashSet<String> = HashSet::new();

    for history in by_user.values() {
        if history.len() < 2 {
            continue;
        }
        let Some((held_out, training)) = history.split_last() else {
            continue;
        };

        let profile = Itemset::new(
            training
                .iter()
                .flat_map(|record| record.genres.iter().cloned()),
        );
        let relevant: HashSet<&str> = held_out.genres.iter().map(String::as_str).collect();

        let recs = recommend(&profile, rules, top_k)?;
        let mut hits = 0usize;
        for rec in &recs {
            recommended_genres.insert(rec.genre.clone());
            if relevant.contains(rec.genre.as_str()) {
                hits += 1;
            }
        }

        precisions.push(hits as f64 / top_k as f64);
        recalls.push(if relevant.is_empty() {
            0.0
        } else {
            hits as f64 / relevant.len() as f64
        });
    }

    let all_genres: HashSet<&str> = records
        .iter()
        .flat_map(|record| record.genres.iter().map(String::as_str))
        .collect();
    let coverage = if all_genres.is_empty() {
        0.0
    } else {
        recommended_genres.len() as f64 / all_genres.len() as f64
    };

    Ok(EvaluationReport {
        precision: mean(&precisions),
        recall: mean(&recalls),
        coverage,
        users_evaluated: precisions.len(),
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
