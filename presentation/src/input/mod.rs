//! Question sources for batch mode

pub mod line_source;
