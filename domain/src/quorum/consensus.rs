//! Answer consensus
//!
//! Turns the answers gathered by one poll into a single final answer.
//!
//! # Resolution order
//!
//! ```text
//! answers ──► match counts (score ≥ 0.7, self included)
//!         ──► VoteTally (max count per normalized answer)
//!         ──► ProviderVoteTally (exact-normalized votes per provider)
//!
//! 1. Consensus           first tally key with count ≥ required_matches
//! 2. ProviderPreference  key with most answers from the primary provider
//! 3. BestMatch           answer with the highest individual match count
//! 4. FirstAvailable      first answer in configured model order
//! ```
//!
//! Every step is deterministic given the answer order, and the chain always
//! ends with an answer as long as at least one model answered.

use super::rule::QuorumRequirement;
use super::tally::{ProviderVoteTally, VoteTally};
use crate::answer::normalize::normalize;
use crate::answer::similarity::{MATCH_THRESHOLD, score_normalized};
use crate::core::identity::{ModelIdentity, Provider};
use crate::poll::Answer;
use serde::{Deserialize, Serialize};

/// Which step of the resolution chain produced the answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Enough similar answers to meet the quorum
    Consensus,
    /// No quorum; the primary provider's most common answer
    ProviderPreference,
    /// No quorum; the answer most other answers agreed with
    BestMatch,
    /// No quorum; the first answer in model order
    FirstAvailable,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Consensus => "consensus",
            Resolution::ProviderPreference => "provider_preference",
            Resolution::BestMatch => "best_match",
            Resolution::FirstAvailable => "first_available",
        }
    }

    /// Whether the quorum was actually met
    pub fn is_consensus(&self) -> bool {
        matches!(self, Resolution::Consensus)
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Consensus policy: quorum plus the provider-preference fallback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsensusPolicy {
    pub requirement: QuorumRequirement,
    /// Fall back to the primary provider's answer when there is no quorum
    pub prefer_primary: bool,
    /// Provider trusted most when there is no quorum
    pub primary: Provider,
}

impl Default for ConsensusPolicy {
    fn default() -> Self {
        Self {
            requirement: QuorumRequirement::default(),
            prefer_primary: true,
            primary: Provider::Perplexity,
        }
    }
}

impl ConsensusPolicy {
    pub fn with_requirement(mut self, requirement: QuorumRequirement) -> Self {
        self.requirement = requirement;
        self
    }

    pub fn with_prefer_primary(mut self, prefer: bool) -> Self {
        self.prefer_primary = prefer;
        self
    }

    pub fn with_primary(mut self, primary: Provider) -> Self {
        self.primary = primary;
        self
    }
}

/// One answer and how many answers (itself included) agreed with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerVote {
    pub identity: ModelIdentity,
    pub text: String,
    pub normalized: String,
    pub match_count: usize,
}

/// Final answer of a poll and how it was reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusDecision {
    /// Literal answer text, as produced by `identity`
    pub answer: String,
    pub identity: ModelIdentity,
    pub resolution: Resolution,
    pub required_matches: usize,
    /// Tally count of the chosen answer's normalized form
    pub support: usize,
    pub total_answers: usize,
    /// Per-answer match counts, in model order
    pub votes: Vec<AnswerVote>,
}

/// Resolves a poll's answers into one answer
///
/// # Example
///
/// ```
/// use answer_quorum_domain::{Answer, ConsensusResolver, ModelIdentity, Provider, Resolution};
///
/// let answers = vec![
///     Answer::new(ModelIdentity::new(Provider::Perplexity, "sonar"), "Paris"),
///     Answer::new(ModelIdentity::new(Provider::Groq, "llama"), "paris"),
///     Answer::new(ModelIdentity::new(Provider::Groq, "gemma"), "Paris."),
/// ];
///
/// let decision = ConsensusResolver::default().resolve(&answers, None).unwrap();
/// assert_eq!(decision.answer, "Paris");
/// assert_eq!(decision.resolution, Resolution::Consensus);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConsensusResolver {
    policy: ConsensusPolicy,
}

impl ConsensusResolver {
    pub fn new(policy: ConsensusPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ConsensusPolicy {
        &self.policy
    }

    /// Resolve `answers` (in configured model order) into one answer.
    ///
    /// `required_matches` overrides the policy's quorum; either way it is
    /// capped at the number of answers. Returns `None` only when `answers`
    /// is empty.
    pub fn resolve(
        &self,
        answers: &[Answer],
        required_matches: Option<usize>,
    ) -> Option<ConsensusDecision> {
        if answers.is_empty() {
            return None;
        }

        let normalized: Vec<String> = answers.iter().map(|a| normalize(&a.text)).collect();
        let mut tally = VoteTally::new();
        let mut provider_tally = ProviderVoteTally::new();
        let mut votes = Vec::with_capacity(answers.len());
        let mut best: Option<usize> = None;
        let mut best_count = 0;

        for (i, answer) in answers.iter().enumerate() {
            let match_count = normalized
                .iter()
                .filter(|other| score_normalized(&normalized[i], other) >= MATCH_THRESHOLD)
                .count();

            tally.record_max(&normalized[i], match_count);
            provider_tally.increment(&normalized[i], answer.identity.provider());

            if match_count > best_count {
                best_count = match_count;
                best = Some(i);
            }

            votes.push(AnswerVote {
                identity: answer.identity.clone(),
                text: answer.text.clone(),
                normalized: normalized[i].clone(),
                match_count,
            });
        }

        let total = answers.len();
        let required = required_matches
            .unwrap_or_else(|| self.policy.requirement.required_matches(total))
            .min(total);

        let decide = |index: usize, resolution: Resolution| {
            let key = &normalized[index];
            Some(ConsensusDecision {
                answer: answers[index].text.clone(),
                identity: answers[index].identity.clone(),
                resolution,
                required_matches: required,
                support: tally.get(key).unwrap_or(0),
                total_answers: total,
                votes: votes.clone(),
            })
        };
        let first_with_key = |key: &str| normalized.iter().position(|n| n == key);

        if let Some(entry) = tally.first_reaching(required)
            && let Some(index) = first_with_key(&entry.normalized)
        {
            return decide(index, Resolution::Consensus);
        }

        if self.policy.prefer_primary
            && let Some((key, count)) = provider_tally.best_for(self.policy.primary)
            && count > 0
            && let Some(index) = first_with_key(key)
        {
            return decide(index, Resolution::ProviderPreference);
        }

        if let Some(index) = best {
            return decide(index, Resolution::BestMatch);
        }

        decide(0, Resolution::FirstAvailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(spec: &str, text: &str) -> Answer {
        Answer::new(spec.parse().unwrap(), text)
    }

    fn resolver() -> ConsensusResolver {
        ConsensusResolver::default()
    }

    #[test]
    fn test_empty_answers_resolve_to_none() {
        assert!(resolver().resolve(&[], None).is_none());
        assert!(resolver().resolve(&[], Some(1)).is_none());
    }

    #[test]
    fn test_scenario_a_paris_cluster() {
        let answers = vec![
            answer("perplexity:m1", "Paris"),
            answer("groq:m2", "paris"),
            answer("groq:m3", "Paris."),
            answer("groq:m4", "London"),
        ];

        let decision = resolver().resolve(&answers, None).unwrap();
        assert_eq!(decision.answer, "Paris");
        assert_eq!(decision.resolution, Resolution::Consensus);
        assert_eq!(decision.required_matches, 3);
        assert_eq!(decision.support, 3);
        assert_eq!(decision.total_answers, 4);

        let counts: Vec<_> = decision.votes.iter().map(|v| v.match_count).collect();
        assert_eq!(counts, vec![3, 3, 3, 1]);
    }

    #[test]
    fn test_scenario_b_prefers_primary_provider() {
        let answers = vec![
            answer("groq:a", "Jupiter"),
            answer("groq:b", "Photosynthesis"),
            answer("perplexity:sonar", "Mitochondria"),
            answer("groq:c", "Shakespeare"),
            answer("groq:d", "Everest"),
        ];

        let decision = resolver().resolve(&answers, None).unwrap();
        assert_eq!(decision.answer, "Mitochondria");
        assert_eq!(decision.resolution, Resolution::ProviderPreference);
        assert_eq!(decision.identity.provider(), Provider::Perplexity);
    }

    #[test]
    fn test_preference_picks_primary_majority_key() {
        let answers = vec![
            answer("perplexity:a", "Lyon"),
            answer("perplexity:b", "Nice"),
            answer("perplexity:c", "nice"),
            answer("groq:d", "Lyon"),
            answer("groq:e", "Lyon"),
            answer("groq:f", "Marseille"),
        ];
        // required = max(3, ceil(3.6)) = 4; Lyon cluster = 3, Nice cluster = 2
        let decision = resolver().resolve(&answers, None).unwrap();
        assert_eq!(decision.resolution, Resolution::ProviderPreference);
        assert_eq!(decision.answer, "Nice");
    }

    #[test]
    fn test_preference_disabled_falls_to_best_match() {
        let policy = ConsensusPolicy::default().with_prefer_primary(false);
        let answers = vec![
            answer("perplexity:a", "Mars"),
            answer("groq:b", "Venus"),
            answer("groq:c", "venus"),
            answer("groq:d", "Earth"),
            answer("groq:e", "Saturn"),
        ];

        let decision = ConsensusResolver::new(policy)
            .resolve(&answers, None)
            .unwrap();
        assert_eq!(decision.resolution, Resolution::BestMatch);
        assert_eq!(decision.answer, "Venus");
    }

    #[test]
    fn test_no_primary_answers_falls_to_best_match() {
        let answers = vec![
            answer("groq:a", "Mars"),
            answer("groq:b", "Venus"),
            answer("groq:c", "Venus"),
            answer("groq:d", "Earth"),
        ];

        let decision = resolver().resolve(&answers, None).unwrap();
        assert_eq!(decision.resolution, Resolution::BestMatch);
        assert_eq!(decision.answer, "Venus");
        assert_eq!(decision.identity.model(), "b");
    }

    #[test]
    fn test_best_match_ties_go_to_first() {
        let answers = vec![
            answer("groq:a", "Mars"),
            answer("groq:b", "Venus"),
            answer("groq:c", "Earth"),
        ];
        let policy = ConsensusPolicy::default()
            .with_requirement(QuorumRequirement::new(3, 1.0).unwrap());

        let decision = ConsensusResolver::new(policy)
            .resolve(&answers, None)
            .unwrap();
        assert_eq!(decision.resolution, Resolution::BestMatch);
        assert_eq!(decision.answer, "Mars");
    }

    #[test]
    fn test_single_answer_is_consensus() {
        let answers = vec![answer("groq:a", "Oxygen")];
        let decision = resolver().resolve(&answers, None).unwrap();
        // required = min(3, 1) = 1
        assert_eq!(decision.required_matches, 1);
        assert_eq!(decision.resolution, Resolution::Consensus);
        assert_eq!(decision.answer, "Oxygen");
    }

    #[test]
    fn test_explicit_required_matches_is_capped() {
        let answers = vec![answer("groq:a", "Oxygen"), answer("groq:b", "oxygen")];
        let decision = resolver().resolve(&answers, Some(10)).unwrap();
        assert_eq!(decision.required_matches, 2);
        assert_eq!(decision.resolution, Resolution::Consensus);
    }

    #[test]
    fn test_explicit_required_matches_overrides_policy() {
        let answers = vec![
            answer("groq:a", "Oxygen"),
            answer("groq:b", "oxygen"),
            answer("groq:c", "Nitrogen"),
            answer("groq:d", "Helium"),
            answer("groq:e", "Argon"),
        ];
        let decision = resolver().resolve(&answers, Some(2)).unwrap();
        assert_eq!(decision.resolution, Resolution::Consensus);
        assert_eq!(decision.answer, "Oxygen");
    }

    #[test]
    fn test_consensus_returns_first_literal_of_key() {
        let answers = vec![
            answer("groq:a", "London"),
            answer("groq:b", "PARIS"),
            answer("groq:c", "Paris"),
            answer("groq:d", "paris"),
        ];
        let decision = resolver().resolve(&answers, None).unwrap();
        assert_eq!(decision.resolution, Resolution::Consensus);
        assert_eq!(decision.answer, "PARIS");
        assert_eq!(decision.identity.model(), "b");
    }

    #[test]
    fn test_consensus_property_identical_answers() {
        let answers = vec![
            answer("groq:a", "Blue Whale"),
            answer("perplexity:b", "Elephant"),
            answer("groq:c", "blue  whale"),
            answer("groq:d", "BLUE WHALE"),
            answer("groq:e", "Giraffe"),
        ];
        let decision = resolver().resolve(&answers, None).unwrap();
        assert_eq!(normalize(&decision.answer), "blue whale");
        assert!(decision.resolution.is_consensus());
    }

    #[test]
    fn test_cluster_max_counts_similar_neighbours() {
        // "Paris" matches both variants, lifting its key to 3 although only
        // one answer normalizes to "paris".
        let answers = vec![
            answer("groq:a", "Paris France"),
            answer("groq:b", "Paris"),
            answer("groq:c", "Paris, capital"),
        ];
        let decision = resolver().resolve(&answers, None).unwrap();
        let counts: Vec<_> = decision.votes.iter().map(|v| v.match_count).collect();
        assert_eq!(counts, vec![2, 3, 2]);
        assert_eq!(decision.resolution, Resolution::Consensus);
        assert_eq!(decision.answer, "Paris");
    }

    #[test]
    fn test_all_empty_answers_do_not_panic() {
        let answers = vec![
            answer("groq:a", ""),
            answer("perplexity:b", "   "),
            answer("groq:c", ""),
        ];
        let decision = resolver().resolve(&answers, None).unwrap();
        assert_eq!(decision.resolution, Resolution::Consensus);
        assert_eq!(decision.answer, "");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let answers = vec![
            answer("groq:a", "Mercury"),
            answer("groq:b", "Venus"),
            answer("perplexity:c", "Mars"),
            answer("perplexity:d", "Jupiter"),
            answer("groq:e", "Saturn"),
        ];
        let first = resolver().resolve(&answers, None).unwrap();
        for _ in 0..20 {
            assert_eq!(resolver().resolve(&answers, None).unwrap(), first);
        }
        assert_eq!(first.answer, "Mars");
    }

    #[test]
    fn test_custom_primary_provider() {
        let policy = ConsensusPolicy::default().with_primary(Provider::Groq);
        let answers = vec![
            answer("perplexity:a", "Mercury"),
            answer("groq:b", "Venus"),
            answer("perplexity:c", "Mars"),
        ];
        let decision = ConsensusResolver::new(policy)
            .resolve(&answers, None)
            .unwrap();
        assert_eq!(decision.resolution, Resolution::ProviderPreference);
        assert_eq!(decision.answer, "Venus");
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(Resolution::Consensus.to_string(), "consensus");
        assert_eq!(
            Resolution::ProviderPreference.to_string(),
            "provider_preference"
        );
        assert!(!Resolution::BestMatch.is_consensus());
    }
}
