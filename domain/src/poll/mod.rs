//! Poll domain
//!
//! Value objects produced when one question is fanned out to every
//! configured model. The fan-out itself lives in the application layer.

pub mod value_objects;

pub use value_objects::{
    Answer, ModelResult, ModelStatus, PollCounts, PollOutcome, RawResponse,
};
