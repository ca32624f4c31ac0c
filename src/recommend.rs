//! Recommendation scoring against a user's genre profile

use std::collections::HashMap;

use crate::itemset::Itemset;
use crate::rules::AssociationRule;

/// Reasons attached per recommendation are capped at this many.
const MAX_REASONS: usize = 3;

/// A scored genre suggestion with human-readable justifications.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub genre: String,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Score genres for `profile` and return at most `top_k` recommendations,
/// highest score first.
///
/// A rule contributes only when its whole antecedent is contained in the
/// profile, and never suggests a genre already in the profile. Each
/// qualifying rule adds `confidence * lift` to the genre's running score and
/// one justification string; reasons keep their accumulation order and are
/// truncated to three. Ties in score are broken by genre name ascending.
/// Fewer than `top_k` results is not an error; `top_k` of zero is.
pub fn recommend(
    profile: &Itemset,
    rules: &[AssociationRule],
    top_k: usize,
) -> crate::Result<Vec<Recommendation>> {
    if top_k == 0 {
        anyhow::bail!("top_k must be at least 1");
    }

    // Local accumulation map, built and discarded within this call
    let mut accumulated: HashMap<String, (f64, Vec<String>)> = HashMap::new();
    for rule in rules {
        if !rule.antecedent.is_subset_of(profile) {
            continue;
        }
        for genre in rule.consequent.iter() {
            if profile.contains(genre) {
                continue;
            }
            let entry = accumulated.entry(genre.clone()).or_default();
            entry.0 += rule.confidence * rule.lift;
            entry.1.push(format!(
                "users who like {} also like {}",
                rule.antecedent, genre
            ));
        }
    }

    let mut ranked: Vec<(String, (f64, Vec<String>))> = accumulated.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1 .0
            .partial_cmp(&a.1 .0)
            .expect("Score values must be valid f64 (not NaN)")
            .then_with(|| a.0.cmp(&b.0))
    });

    Ok(ranked
        .into_iter()
        .take(top_k)
        .map(|(genre, (score, mut reasons))| {
            reasons.truncate(MAX_REASONS);
            Recommendation {
                genre,
                score,
                reasons,
            }
        })
        .collect())
}
