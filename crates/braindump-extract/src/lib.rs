//! Braindump Extract — the deterministic text-to-structured-item pipeline.
//!
//! Raw transcript in, cleaned text plus classified, dated draft items out.
//! Every stage is rule-table driven; no model is in the loop.

pub mod builder;
pub mod classify;
pub mod cleaner;
pub mod dates;
pub mod lexicon;
pub mod normalize;
pub mod pipeline;
pub mod segment;
pub mod suggest;

pub use classify::{classify, Classification};
pub use cleaner::TextCleaner;
pub use dates::resolve_dates;
pub use normalize::normalize;
pub use pipeline::process_text;
pub use segment::segment;
pub use suggest::suggest;
