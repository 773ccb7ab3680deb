//! Console rendering of answers, batch summaries and discovery results

pub mod console;
pub mod formatter;
pub mod sink;
