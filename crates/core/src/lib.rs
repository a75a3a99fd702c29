//! Shpora Core Library
//!
//! Study-session orchestration for video content: fetch a transcript once per
//! session, generate an AI summary and a multiple-choice quiz from it, and
//! track the quiz attempt with locked answers and a derived score.

pub mod cache;
pub mod controller;
pub mod error;
pub mod format;
pub mod intelligence;
pub mod pipeline;
pub mod quiz;
pub mod services;
pub mod types;
pub mod youtube;

// Re-export commonly used items at crate root
pub use cache::{TranscriptCache, find_subtitles_in_cache, get_cache_dir, get_root_cache_dir};
pub use controller::SessionController;
pub use error::{Result, ShporaError};
pub use format::{
    format_quiz_results, format_summary_readable, format_timestamp,
    format_transcript_with_timestamps,
};
pub use intelligence::{ChatClient, Provider, ProviderConfig};
pub use pipeline::ContentPipeline;
pub use quiz::{OptionMark, QuizSession, QuizState};
pub use services::{QuizGenerator, Summarizer, TranscriptSource};
pub use types::{Question, Segment, Summary, Transcript};
pub use youtube::SubtitleFetcher;
