//! Vote tallies keyed by normalized answer text.
//!
//! Both tallies keep keys in first-seen order; the consensus scan and the
//! provider-preference scan depend on that order being the configured
//! model order.

use crate::core::identity::Provider;
use serde::Serialize;
use std::collections::BTreeMap;

/// One normalized answer and its vote count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TallyEntry {
    pub normalized: String,
    pub count: usize,
}

/// Normalized answer → largest match count seen for any answer with that
/// normalized form.
///
/// The count is a similarity-cluster size, not the number of identical
/// answers: near-duplicates that normalize differently still support each
/// other's keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VoteTally {
    entries: Vec<TallyEntry>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `count` for `normalized`, keeping the maximum per key
    pub fn record_max(&mut self, normalized: &str, count: usize) {
        match self.entries.iter_mut().find(|e| e.normalized == normalized) {
            Some(entry) => entry.count = entry.count.max(count),
            None => self.entries.push(TallyEntry {
                normalized: normalized.to_string(),
                count,
            }),
        }
    }

    pub fn get(&self, normalized: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.normalized == normalized)
            .map(|e| e.count)
    }

    /// First key (in insertion order) whose count reaches `required`
    pub fn first_reaching(&self, required: usize) -> Option<&TallyEntry> {
        self.entries.iter().find(|e| e.count >= required)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TallyEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalized answer → provider → number of answers from that provider
/// with exactly that normalized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProviderVoteTally {
    entries: Vec<(String, BTreeMap<Provider, usize>)>,
}

impl ProviderVoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, normalized: &str, provider: Provider) {
        let index = match self.entries.iter().position(|(key, _)| key == normalized) {
            Some(index) => index,
            None => {
                self.entries
                    .push((normalized.to_string(), BTreeMap::new()));
                self.entries.len() - 1
            }
        };
        *self.entries[index].1.entry(provider).or_insert(0) += 1;
    }

    pub fn count(&self, normalized: &str, provider: Provider) -> usize {
        self.entries
            .iter()
            .find(|(key, _)| key == normalized)
            .and_then(|(_, per_provider)| per_provider.get(&provider).copied())
            .unwrap_or(0)
    }

    /// Key with the most answers from `provider`.
    ///
    /// Scans keys in insertion order with a running maximum that starts
    /// below zero and is only replaced by a strictly greater count, so the
    /// first key wins ties. The winning count may be zero when the provider
    /// gave no answers at all.
    pub fn best_for(&self, provider: Provider) -> Option<(&str, usize)> {
        let mut best: Option<(&str, usize)> = None;
        let mut best_count: i64 = -1;
        for (key, per_provider) in &self.entries {
            let count = per_provider.get(&provider).copied().unwrap_or(0);
            if count as i64 > best_count {
                best_count = count as i64;
                best = Some((key.as_str(), count));
            }
        }
        best
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_tally_keeps_max_and_order() {
        let mut tally = VoteTally::new();
        tally.record_max("paris", 2);
        tally.record_max("london", 1);
        tally.record_max("paris", 1);
        tally.record_max("paris", 3);

        assert_eq!(tally.len(), 2);
        assert_eq!(tally.get("paris"), Some(3));
        assert_eq!(tally.get("london"), Some(1));
        assert_eq!(tally.get("rome"), None);

        let keys: Vec<_> = tally.iter().map(|e| e.normalized.as_str()).collect();
        assert_eq!(keys, vec!["paris", "london"]);
    }

    #[test]
    fn test_first_reaching_uses_insertion_order() {
        let mut tally = VoteTally::new();
        tally.record_max("a", 1);
        tally.record_max("b", 3);
        tally.record_max("c", 4);

        assert_eq!(tally.first_reaching(3).unwrap().normalized, "b");
        assert_eq!(tally.first_reaching(4).unwrap().normalized, "c");
        assert!(tally.first_reaching(5).is_none());
    }

    #[test]
    fn test_provider_tally_counts() {
        let mut tally = ProviderVoteTally::new();
        tally.increment("paris", Provider::Perplexity);
        tally.increment("paris", Provider::Groq);
        tally.increment("paris", Provider::Groq);
        tally.increment("lyon", Provider::Groq);

        assert_eq!(tally.len(), 2);
        assert_eq!(tally.count("paris", Provider::Perplexity), 1);
        assert_eq!(tally.count("paris", Provider::Groq), 2);
        assert_eq!(tally.count("lyon", Provider::Perplexity), 0);
        assert_eq!(tally.count("rome", Provider::Groq), 0);
    }

    #[test]
    fn test_best_for_prefers_highest_then_first() {
        let mut tally = ProviderVoteTally::new();
        tally.increment("lyon", Provider::Groq);
        tally.increment("paris", Provider::Perplexity);
        tally.increment("nice", Provider::Perplexity);
        tally.increment("nice", Provider::Perplexity);

        assert_eq!(tally.best_for(Provider::Perplexity), Some(("nice", 2)));
        assert_eq!(tally.best_for(Provider::Groq), Some(("lyon", 1)));
    }

    #[test]
    fn test_best_for_without_provider_votes_is_first_key_with_zero() {
        let mut tally = ProviderVoteTally::new();
        tally.increment("lyon", Provider::Groq);
        tally.increment("nice", Provider::Groq);

        assert_eq!(tally.best_for(Provider::Perplexity), Some(("lyon", 0)));
        assert_eq!(ProviderVoteTally::new().best_for(Provider::Groq), None);
    }
}
