//! Logging infrastructure - structured answer logging.
//!
//! Provides [`JsonlAnswerLogger`], a JSONL file writer that implements
//! the [`AnswerLogger`](answer_quorum_application::AnswerLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlAnswerLogger;
