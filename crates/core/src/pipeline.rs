use std::sync::Arc;

use crate::{
    cache::TranscriptCache,
    error::{Result, ShporaError},
    services::{QuizGenerator, Summarizer, TranscriptSource},
    types::{Question, Summary},
};

/// Sequences transcript acquisition and content generation.
///
/// Summary and quiz requests are independent entry points that share one
/// cached transcript; each call produces a fresh derived artifact.
pub struct ContentPipeline {
    cache: TranscriptCache,
    summarizer: Arc<dyn Summarizer>,
    quiz_generator: Arc<dyn QuizGenerator>,
}

impl ContentPipeline {
    pub fn new(
        source: Arc<dyn TranscriptSource>,
        summarizer: Arc<dyn Summarizer>,
        quiz_generator: Arc<dyn QuizGenerator>,
    ) -> Self {
        Self {
            cache: TranscriptCache::new(source),
            summarizer,
            quiz_generator,
        }
    }

    /// Resolve the transcript, then produce a summary from it.
    pub async fn request_summary(&self, video_ref: &str) -> Result<Summary> {
        let transcript = self.cache.get_or_fetch(video_ref).await?;
        self.summarizer.summarize(&transcript).await
    }

    /// Resolve the transcript, then produce a question list from it.
    /// An empty or malformed question list counts as a generation failure.
    pub async fn request_quiz(&self, video_ref: &str) -> Result<Vec<Question>> {
        let transcript = self.cache.get_or_fetch(video_ref).await?;
        let questions = self.quiz_generator.generate_quiz(&transcript).await?;

        if questions.is_empty() {
            return Err(ShporaError::QuizGenerationFailed {
                reason: "service returned no questions".to_string(),
            });
        }
        if let Some(bad) = questions.iter().find(|q| !q.is_well_formed()) {
            return Err(ShporaError::QuizGenerationFailed {
                reason: format!("answer key not among options for {:?}", bad.prompt),
            });
        }

        Ok(questions)
    }

    /// Forget the cached transcript; the next request fetches anew.
    pub fn invalidate_transcript(&self) {
        self.cache.invalidate();
    }
}
