//! Level-wise Apriori mining of frequent genre itemsets

use std::collections::{HashMap, HashSet};

use crate::itemset::Itemset;

/// Table of frequent itemsets and their support values.
///
/// Holds every itemset (of every size >= 1) that cleared the minimum-support
/// threshold at its level, keyed for arbitrary subset lookup. Built once per
/// mining run and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequentItemsets {
    table: HashMap<Itemset, f64>,
}

impl FrequentItemsets {
    /// Support of `itemset`, or `None` if it did not clear the threshold.
    pub fn support(&self, itemset: &Itemset) -> Option<f64> {
        self.table.get(itemset).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Itemset, f64)> {
        self.table.iter().map(|(itemset, support)| (itemset, *support))
    }

    /// Itemsets of exactly `k` members, sorted by support descending then by
    /// itemset for a stable display order.
    pub fn of_size(&self, k: usize) -> Vec<(&Itemset, f64)> {
        let mut entries: Vec<(&Itemset, f64)> = self
            .iter()
            .filter(|(itemset, _)| itemset.len() == k)
            .collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .expect("Support values must be valid f64 (not NaN)")
                .then_with(|| a.0.cmp(b.0))
        });
        entries
    }

    /// Size of the largest itemset in the table.
    pub fn max_size(&self) -> usize {
        self.iter().map(|(itemset, _)| itemset.len()).max().unwrap_or(0)
    }
}

/// Mine all itemsets whose support meets `minsup`, level by level.
///
/// Level 1 counts individual genres; level k candidates are unions of two
/// distinct frequent (k-1)-itemsets with exactly k members, pruned by a full
/// transaction scan. The loop ends when a level comes up empty. With no
/// transactions the table is empty; a `minsup` above 1.0 empties the table
/// and a non-positive one keeps every observed itemset, both by design of the
/// `support >= minsup` comparison.
pub fn mine_frequent_itemsets(
    transactions: &[Itemset],
    minsup: f64,
) -> crate::Result<FrequentItemsets> {
    if !minsup.is_finite() {
        anyhow::bail!("minimum support must be a finite number, got {}", minsup);
    }

    let mut table = HashMap::new();
    if transactions.is_empty() {
        return Ok(FrequentItemsets { table });
    }

    let mut level = frequent_singletons(transactions, minsup);
    while !level.is_empty() {
        table.extend(level.iter().cloned());

        let candidates = generate_candidates(&level);
        level = candidates
            .into_iter()
            .filter_map(|candidate| {
                let support = support_of(&candidate, transactions);
                (support >= minsup).then_some((candidate, support))
            })
            .collect();
    }

    Ok(FrequentItemsets { table })
}

/// Fraction of transactions that are supersets of `itemset`.
pub fn support_of(itemset: &Itemset, transactions: &[Itemset]) -> f64 {
    if transactions.is_empty() {
        return 0.0;
    }
    let count = transactions
        .iter()
        .filter(|transaction| itemset.is_subset_of(transaction))
        .count();
    count as f64 / transactions.len() as f64
}

/// Frequent 1-itemsets, sorted so candidate generation order does not depend
/// on hash-map iteration.
fn frequent_singletons(transactions: &[Itemset], minsup: f64) -> Vec<(Itemset, f64)> {
    let n = transactions.len() as f64;
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for transaction in transactions {
        for item in transaction.iter() {
            *counts.entry(item.as_str()).or_insert(0) += 1;
        }
    }

    let mut frequent: Vec<(Itemset, f64)> = counts
        .into_iter()
        .filter_map(|(item, count)| {
            let support = count as f64 / n;
            (support >= minsup).then(|| (Itemset::single(item), support))
        })
        .collect();
    frequent.sort_by(|a, b| a.0.cmp(&b.0));
    frequent
}

/// Candidate k-itemsets as unions of pairs of distinct frequent
/// (k-1)-itemsets whose union has exactly k members.
///
/// This is the simplified pairwise join: O(n^2) per level and over-generating
/// compared to a prefix join, but it never misses a true frequent itemset
/// because both (k-1)-subsets of one must themselves be frequent.
fn generate_candidates(level: &[(Itemset, f64)]) -> Vec<Itemset> {
    let k = level.first().map_or(0, |(itemset, _)| itemset.len()) + 1;
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for i in 0..level.len() {
        for j in (i + 1)..level.len() {
            let union = level[i].0.union(&level[j].0);
            if union.len() == k && seen.insert(union.clone()) {
                candidates.push(union);
            }
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transactions(sets: &[&[&str]]) -> Vec<Itemset> {
        sets.iter().map(|items| Itemset::new(items.iter().copied())).collect()
    }

    /// Spec-style fixture: two Mystery+Thriller loans, one Mystery+Crime,
    /// one Romance+Drama.
    fn genre_transactions() -> Vec<Itemset> {
        transactions(&[
            &["Mystery", "Thriller"],
            &["Mystery", "Thriller"],
            &["Mystery", "Crime"],
            &["Romance", "Drama"],
        ])
    }

    #[test]
    fn test_level_one_supports() {
        let frequent = mine_frequent_itemsets(&genre_transactions(), 0.5).unwrap();

        assert_eq!(frequent.support(&Itemset::single("Mystery")), Some(0.75));
        assert_eq!(frequent.support(&Itemset::single("Thriller")), Some(0.5));
        assert_eq!(frequent.support(&Itemset::single("Crime")), None);
        assert_eq!(frequent.support(&Itemset::single("Romance")), None);
        assert_eq!(frequent.support(&Itemset::single("Drama")), None);
    }

    #[test]
    fn test_level_two_pair() {
        let frequent = mine_frequent_itemsets(&genre_transactions(), 0.5).unwrap();

        let pair = Itemset::new(["Mystery", "Thriller"]);
        assert_eq!(frequent.support(&pair), Some(0.5));
        assert_eq!(frequent.len(), 3);
        assert_eq!(frequent.max_size(), 2);
    }

    #[test]
    fn test_empty_transactions() {
        let frequent = mine_frequent_itemsets(&[], 0.5).unwrap();
        assert!(frequent.is_empty());
    }

    #[test]
    fn test_minsup_above_one_empties_table() {
        let frequent = mine_frequent_itemsets(&genre_transactions(), 1.5).unwrap();
        assert!(frequent.is_empty());
    }

    #[test]
    fn test_non_positive_minsup_keeps_everything_observed() {
        let frequent = mine_frequent_itemsets(&genre_transactions(), 0.0).unwrap();

        // All five genres are trivially frequent at minsup <= 0
        for genre in ["Mystery", "Thriller", "Crime", "Romance", "Drama"] {
            assert!(frequent.support(&Itemset::single(genre)).is_some());
        }
    }

    #[test]
    fn test_nan_minsup_is_an_error() {
        let result = mine_frequent_itemsets(&genre_transactions(), f64::NAN);
        assert!(result.is_err());
    }

    #[test]
    fn test_anti_monotonicity() {
        let txns = transactions(&[
            &["Mystery", "Thriller", "Crime"],
            &["Mystery", "Thriller"],
            &["Mystery", "Crime"],
            &["Thriller", "Crime"],
            &["Mystery", "Thriller", "Crime", "Horror"],
        ]);
        let frequent = mine_frequent_itemsets(&txns, 0.4).unwrap();

        for (itemset, support) in frequent.iter() {
            for item in itemset.iter() {
                let subset = itemset.difference(&Itemset::single(item.clone()));
                if subset.is_empty() {
                    continue;
                }
                let subset_support = frequent
                    .support(&subset)
                    .expect("every subset of a frequent itemset must be frequent");
                assert!(subset_support >= support);
            }
        }
    }

    #[test]
    fn test_subset_completeness() {
        let txns = transactions(&[
            &["Mystery", "Thriller", "Crime"],
            &["Mystery", "Thriller", "Crime"],
            &["Mystery", "Thriller"],
            &["Romance"],
        ]);
        let frequent = mine_frequent_itemsets(&txns, 0.5).unwrap();

        // {Mystery, Thriller, Crime} is frequent (0.5); all six proper
        // subsets must be present too
        let triple = Itemset::new(["Crime", "Mystery", "Thriller"]);
        assert_eq!(frequent.support(&triple), Some(0.5));
        for (itemset, _) in frequent.iter() {
            for item in itemset.iter() {
                let subset = itemset.difference(&Itemset::single(item.clone()));
                if !subset.is_empty() {
                    assert!(frequent.support(&subset).is_some());
                }
            }
        }
        assert!(frequent.support(&Itemset::new(["Crime", "Thriller"])).is_some());
    }

    #[test]
    fn test_mining_is_idempotent() {
        let txns = genre_transactions();
        let first = mine_frequent_itemsets(&txns, 0.5).unwrap();
        let second = mine_frequent_itemsets(&txns, 0.5).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_support_of() {
        let txns = genre_transactions();
        let pair = Itemset::new(["Mystery", "Thriller"]);
        assert!((support_of(&pair, &txns) - 0.5).abs() < 1e-10);
        assert!((support_of(&Itemset::single("Mystery"), &txns) - 0.75).abs() < 1e-10);
        assert_eq!(support_of(&pair, &[]), 0.0);
    }

    #[test]
    fn test_of_size_sorted_by_support() {
        let frequent = mine_frequent_itemsets(&genre_transactions(), 0.5).unwrap();
        let singles = frequent.of_size(1);

        assert_eq!(singles.len(), 2);
        assert_eq!(singles[0].0, &Itemset::single("Mystery"));
        assert_eq!(singles[0].1, 0.75);
        assert_eq!(singles[1].0, &Itemset::single("Thriller"));
    }
}
