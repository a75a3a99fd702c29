use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::{
    error::Result,
    pipeline::ContentPipeline,
    quiz::{QuizSession, QuizState},
    types::Summary,
};

struct SessionState {
    video_ref: Option<String>,
    summary: Option<Summary>,
    quiz: QuizSession,
    last_error: Option<String>,
    summary_gen: u64,
    quiz_gen: u64,
}

/// Binds pipeline results to the summary and quiz slots of one study session.
///
/// Each slot carries a generation counter. A request captures the counter
/// value when it starts and only applies its outcome if no newer request for
/// the same slot, and no video-reference change, has bumped the counter since.
/// A stale completion returns to its caller but writes nothing.
pub struct SessionController {
    session_id: Uuid,
    pipeline: ContentPipeline,
    state: Mutex<SessionState>,
}

impl SessionController {
    pub fn new(pipeline: ContentPipeline) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            pipeline,
            state: Mutex::new(SessionState {
                video_ref: None,
                summary: None,
                quiz: QuizSession::new(),
                last_error: None,
                summary_gen: 0,
                quiz_gen: 0,
            }),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Bind the session to a video reference.
    ///
    /// The cached transcript is dropped, both slots are cleared, and any
    /// in-flight request loses the right to write its result.
    pub fn on_video_reference_changed(&self, video_ref: &str) {
        tracing::info!(session_id = %self.session_id, video_ref, "video reference changed");
        self.pipeline.invalidate_transcript();

        let mut state = self.lock_state();
        state.video_ref = Some(video_ref.to_string());
        state.summary = None;
        state.quiz.clear();
        state.last_error = None;
        state.summary_gen += 1;
        state.quiz_gen += 1;
    }

    /// Produce a summary for `video_ref` and, unless superseded, store it in
    /// the summary slot. The quiz slot is never touched.
    pub async fn on_summarize_requested(&self, video_ref: &str) -> Result<()> {
        self.adopt_reference(video_ref);
        let token = {
            let mut state = self.lock_state();
            state.summary_gen += 1;
            state.summary_gen
        };

        match self.pipeline.request_summary(video_ref).await {
            Ok(summary) => {
                let mut state = self.lock_state();
                if state.summary_gen == token {
                    state.summary = Some(summary);
                    state.last_error = None;
                } else {
                    tracing::debug!(session_id = %self.session_id, "discarding stale summary");
                }
                Ok(())
            }
            Err(err) => {
                let mut state = self.lock_state();
                if state.summary_gen == token {
                    state.last_error = Some(err.to_string());
                }
                Err(err)
            }
        }
    }

    /// Produce a quiz for `video_ref` and, unless superseded, load it as a
    /// fresh unanswered attempt. The summary slot is never touched.
    pub async fn on_quiz_requested(&self, video_ref: &str) -> Result<()> {
        self.adopt_reference(video_ref);
        let token = {
            let mut state = self.lock_state();
            state.quiz_gen += 1;
            state.quiz_gen
        };

        match self.pipeline.request_quiz(video_ref).await {
            Ok(questions) => {
                let mut state = self.lock_state();
                if state.quiz_gen == token {
                    state.quiz.load(questions);
                    state.last_error = None;
                } else {
                    tracing::debug!(session_id = %self.session_id, "discarding stale quiz");
                }
                Ok(())
            }
            Err(err) => {
                let mut state = self.lock_state();
                if state.quiz_gen == token {
                    state.last_error = Some(err.to_string());
                }
                Err(err)
            }
        }
    }

    /// Record an answer on the current quiz. An out-of-range index is a
    /// caller bug; it is returned as an error but never stored as the
    /// session's user-facing error.
    pub fn submit_answer(&self, index: usize, option: &str) -> Result<()> {
        let mut state = self.lock_state();
        state.quiz.submit_answer(index, option)
    }

    pub fn video_ref(&self) -> Option<String> {
        self.lock_state().video_ref.clone()
    }

    pub fn summary(&self) -> Option<Summary> {
        self.lock_state().summary.clone()
    }

    /// Snapshot of the current quiz attempt.
    pub fn quiz(&self) -> QuizSession {
        self.lock_state().quiz.clone()
    }

    pub fn quiz_state(&self) -> QuizState {
        self.lock_state().quiz.state()
    }

    pub fn score(&self) -> usize {
        self.lock_state().quiz.score()
    }

    pub fn progress(&self) -> f64 {
        self.lock_state().quiz.progress()
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock_state().last_error.clone()
    }

    /// A request for a reference the session is not bound to counts as a
    /// reference change first.
    fn adopt_reference(&self, video_ref: &str) {
        let current = self.lock_state().video_ref.clone();
        if current.as_deref() != Some(video_ref) {
            self.on_video_reference_changed(video_ref);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().expect("session state poisoned")
    }
}
