//! Canonical itemset representation used as frequent-itemset table keys

use std::fmt;

/// Immutable set of genre labels backed by a sorted, deduplicated vector.
///
/// Two itemsets are equal iff their member sets are equal, regardless of the
/// order items were supplied in, and the hash is stable across insertion
/// orders, so an `Itemset` can key a `HashMap`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Itemset(Vec<String>);

impl Itemset {
    /// Build an itemset from any iterator of labels, sorting and collapsing
    /// duplicates.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut items: Vec<String> = items.into_iter().map(Into::into).collect();
        items.sort();
        items.dedup();
        Itemset(items)
    }

    /// Build a one-element itemset.
    pub fn single(item: impl Into<String>) -> Self {
        Itemset(vec![item.into()])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Member labels in canonical (sorted) order.
    pub fn items(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn contains(&self, item: &str) -> bool {
        self.0.binary_search_by(|probe| probe.as_str().cmp(item)).is_ok()
    }

    pub fn is_subset_of(&self, other: &Itemset) -> bool {
        self.0.iter().all(|item| other.contains(item))
    }

    pub fn union(&self, other: &Itemset) -> Itemset {
        Itemset::new(self.0.iter().chain(other.0.iter()).cloned())
    }

    /// Members of `self` that are not in `other`.
    pub fn difference(&self, other: &Itemset) -> Itemset {
        Itemset(
            self.0
                .iter()
                .filter(|item| !other.contains(item))
                .cloned()
                .collect(),
        )
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}
