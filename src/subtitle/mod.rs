//! Subtitle assembly and translation.
//!
//! Converts timed transcript segments into SRT caption blocks and translates
//! assembled SRT text block by block.

mod srt;
mod translate;

pub use srt::{build_srt, format_timestamp, ZERO_TIMESTAMP};
pub use translate::{translate_srt, TranslationOutcome};
