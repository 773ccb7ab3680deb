//! Poll Models use case
//!
//! Fans one question out to many models with bounded concurrency and
//! collects whatever comes back before a single deadline.
//!
//! ```text
//!            ┌─ permit ─► ModelQueryRunner(PERPLEXITY:sonar) ─┐
//! question ──┼─ permit ─► ModelQueryRunner(GROQ:llama)       ─┼─► slots[index] ─► PollOutcome
//!            └─ (wait) ─► ModelQueryRunner(GROQ:gemma)       ─┘        ▲
//!                                                                      │
//!                                    deadline = clamp(n × 1.5s, 15s, 20s)
//! ```

use crate::config::PollParams;
use crate::ports::progress::{NoProgress, PollProgressNotifier};
use crate::ports::provider_gateway::ProviderGateway;
use crate::use_cases::query_model::ModelQueryRunner;
use answer_quorum_domain::{
    Answer, AnswerExtractor, ModelIdentity, ModelResult, ModelStatus, PollOutcome, Question,
    RawResponse, dedup_identities,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Polls a set of models for one question
pub struct ParallelPoll<G: ProviderGateway + 'static> {
    runner: ModelQueryRunner<G>,
    extractor: AnswerExtractor,
    params: PollParams,
}

impl<G: ProviderGateway + 'static> ParallelPoll<G> {
    pub fn new(runner: ModelQueryRunner<G>) -> Self {
        let extractor = AnswerExtractor::new(runner.params().max_answer_words);
        Self {
            runner,
            extractor,
            params: PollParams::default(),
        }
    }

    pub fn with_params(mut self, params: PollParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &PollParams {
        &self.params
    }

    /// Poll with default (no-op) progress
    pub async fn poll(&self, question: &Question, identities: &[ModelIdentity]) -> PollOutcome {
        self.poll_with_progress(question, identities, &NoProgress)
            .await
    }

    /// Poll with progress callbacks.
    ///
    /// Never fails. Repeated identities are polled once. Models still
    /// running at the deadline are aborted and reported as
    /// [`ModelStatus::TimedOut`].
    pub async fn poll_with_progress(
        &self,
        question: &Question,
        identities: &[ModelIdentity],
        progress: &dyn PollProgressNotifier,
    ) -> PollOutcome {
        let identities = dedup_identities(identities.iter().cloned());
        let identities = identities.as_slice();
        let started = Instant::now();
        let budget = self.params.deadline_for(identities.len());
        let deadline = started + budget;

        info!(
            "Polling {} models (deadline {:.1}s)",
            identities.len(),
            budget.as_secs_f64()
        );
        progress.on_poll_start(identities.len(), budget);

        let semaphore = Arc::new(Semaphore::new(self.params.max_concurrency.max(1)));
        let mut join_set = JoinSet::new();
        let mut task_slots = HashMap::with_capacity(identities.len());

        for (index, identity) in identities.iter().enumerate() {
            let runner = self.runner.clone();
            let semaphore = Arc::clone(&semaphore);
            let identity = identity.clone();
            let question = question.clone();

            let handle = join_set.spawn(async move {
                // A closed semaphore only means no limit is left to respect.
                let _permit = semaphore.acquire_owned().await.ok();
                let response = runner.query(&identity, &question).await;
                (index, response)
            });
            task_slots.insert(handle.id(), index);
        }

        let mut slots: Vec<Option<RawResponse>> = vec![None; identities.len()];
        let mut worker_failed = vec![false; identities.len()];
        let mut errors = Vec::new();
        let mut deadline_hit = false;

        loop {
            match tokio::time::timeout_at(deadline, join_set.join_next()).await {
                Ok(Some(Ok((index, response)))) => {
                    progress.on_model_complete(&response.identity, response.is_success());
                    slots[index] = Some(response);
                }
                Ok(Some(Err(e))) => {
                    warn!("Poll worker failed: {}", e);
                    if let Some(&index) = task_slots.get(&e.id()) {
                        worker_failed[index] = true;
                        progress.on_model_complete(&identities[index], false);
                    }
                    errors.push(format!("Worker failed: {e}"));
                }
                Ok(None) => break,
                Err(_) => {
                    deadline_hit = true;
                    join_set.abort_all();
                    break;
                }
            }
        }

        let mut answers = Vec::new();
        let mut results = Vec::with_capacity(identities.len());
        let mut timed_out = 0;

        for ((identity, slot), failed) in identities.iter().zip(slots).zip(worker_failed) {
            let result = match slot {
                Some(response) => {
                    errors.extend(response.attempt_errors.iter().cloned());
                    self.classify(identity, response, &mut answers)
                }
                None if deadline_hit && !failed => {
                    timed_out += 1;
                    ModelResult {
                        identity: identity.clone(),
                        status: ModelStatus::TimedOut,
                        raw_text: None,
                    }
                }
                None => ModelResult {
                    identity: identity.clone(),
                    status: ModelStatus::Failed("worker failed".to_string()),
                    raw_text: None,
                },
            };
            results.push(result);
        }

        if timed_out > 0 {
            warn!("{} model(s) still running at the deadline", timed_out);
            errors.push(format!("Timeout: {timed_out} model(s) slow"));
        }

        let outcome = PollOutcome {
            answers,
            results,
            errors,
            elapsed: started.elapsed(),
        };
        info!(
            "Poll collected {} answers from {} models in {:.2}s",
            outcome.answers.len(),
            identities.len(),
            outcome.elapsed.as_secs_f64()
        );
        progress.on_poll_complete(&outcome);
        outcome
    }

    fn classify(
        &self,
        identity: &ModelIdentity,
        response: RawResponse,
        answers: &mut Vec<Answer>,
    ) -> ModelResult {
        let status = match &response.text {
            Some(raw) => {
                let core = self.extractor.extract(raw);
                if core.is_empty() {
                    debug!("{} gave nothing usable: {:?}", identity, raw);
                    ModelStatus::Unusable
                } else {
                    answers.push(Answer::new(identity.clone(), core.clone()));
                    ModelStatus::Answered(core)
                }
            }
            None => ModelStatus::Failed(response.error.clone().unwrap_or_default()),
        };

        ModelResult {
            identity: identity.clone(),
            status,
            raw_text: response.text,
        }
    }
}
