//! Association-rule derivation from the frequent-itemset table

use serde::Serialize;

use crate::itemset::Itemset;
use crate::miner::FrequentItemsets;

/// Directional association rule antecedent => consequent.
///
/// Antecedent and consequent are disjoint and their union is a frequent
/// itemset; rules are immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationRule {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    /// Support of antecedent ∪ consequent
    pub support: f64,
    /// support(union) / support(antecedent)
    pub confidence: f64,
    /// confidence / support(consequent)
    pub lift: f64,
}

/// Export form of a rule with metrics rounded to four decimals for stable
/// serialization. The persistence mechanism itself is the caller's job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleRecord {
    pub antecedent: Vec<String>,
    pub consequent: Vec<String>,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
}

/// Derive rules from every frequent itemset of size >= 2.
///
/// Each non-empty proper subset becomes a candidate antecedent with the rest
/// of the itemset as consequent. Antecedent and consequent supports are
/// looked up in the table, never recomputed; a missing lookup skips the
/// candidate. A rule is emitted iff confidence >= `minconf` and lift >=
/// `minlift`. Output order is unspecified.
pub fn generate_rules(
    frequent: &FrequentItemsets,
    minconf: f64,
    minlift: f64,
) -> crate::Result<Vec<AssociationRule>> {
    if !minconf.is_finite() || !minlift.is_finite() {
        anyhow::bail!(
            "confidence and lift thresholds must be finite, got minconf={} minlift={}",
            minconf,
            minlift
        );
    }

    let mut rules = Vec::new();
    for (itemset, itemset_support) in frequent.iter() {
        if itemset.len() < 2 {
            continue;
        }

        for antecedent in proper_subsets(itemset) {
            let consequent = itemset.difference(&antecedent);

            // Both should be present by the miner's subset-completeness
            // invariant; checked anyway since they are looked up
            let Some(antecedent_support) = frequent.support(&antecedent) else {
                continue;
            };
            let Some(consequent_support) = frequent.support(&consequent) else {
                continue;
            };

            let confidence = itemset_support / antecedent_support;
            let lift = confidence / consequent_support;

            if confidence >= minconf && lift >= minlift {
                rules.push(AssociationRule {
                    antecedent,
                    consequent,
                    support: itemset_support,
                    confidence,
                    lift,
                });
            }
        }
    }

    Ok(rules)
}

/// Convert rules to their serializable export form, preserving order.
pub fn to_records(rules: &[AssociationRule]) -> Vec<RuleRecord> {
    rules
        .iter()
        .map(|rule| RuleRecord {
            antecedent: rule.antecedent.items().to_vec(),
            consequent: rule.consequent.items().to_vec(),
            support: round4(rule.support),
            confidence: round4(rule.confidence),
            lift: round4(rule.lift),
        })
        .collect()
}

/// All non-empty proper subsets of `itemset`, enumerated by bitmask.
fn proper_subsets(itemset: &Itemset) -> Vec<Itemset> {
    let items = itemset.items();
    let n = items.len();
    let full: usize = (1 << n) - 1;

    let mut subsets = Vec::with_capacity(full.saturating_sub(1));
    for mask in 1..full {
        let members = items
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, item)| item.clone());
        subsets.push(Itemset::new(members));
    }
    subsets
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
