use async_trait::async_trait;

use crate::{
    error::Result,
    types::{Question, Summary, Transcript},
};

/// Produces the transcript for a video reference.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch_transcript(&self, video_ref: &str) -> Result<Transcript>;
}

/// Turns a transcript into readable prose.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, transcript: &Transcript) -> Result<Summary>;
}

/// Turns a transcript into multiple-choice questions.
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    async fn generate_quiz(&self, transcript: &Transcript) -> Result<Vec<Question>>;
}
