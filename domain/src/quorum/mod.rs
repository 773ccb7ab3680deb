//! Answer consensus
//!
//! Decides which of the answers collected from a poll is returned.
//!
//! # Flow
//!
//! ```text
//! ┌──────────────┐   ┌─────────────────────────┐   ┌───────────────────┐
//! │  Answers     │──►│  Tallies                 │──►│  ConsensusDecision │
//! │ (model order)│   │  VoteTally               │   │  answer + how      │
//! └──────────────┘   │  ProviderVoteTally       │   └───────────────────┘
//!                    └─────────────────────────┘
//!                               ▲
//!                    QuorumRequirement (min 3, 60%)
//! ```

pub mod consensus;
pub mod rule;
pub mod tally;

pub use consensus::{
    AnswerVote, ConsensusDecision, ConsensusPolicy, ConsensusResolver, Resolution,
};
pub use rule::{DEFAULT_MIN_REQUIRED, DEFAULT_REQUIRED_RATIO, QuorumRequirement};
pub use tally::{ProviderVoteTally, TallyEntry, VoteTally};
