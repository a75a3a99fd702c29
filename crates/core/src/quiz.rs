use std::collections::BTreeMap;

use crate::{
    error::{Result, ShporaError},
    types::Question,
};

/// Where a quiz attempt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    /// No quiz loaded.
    Empty,
    /// At least one question still unanswered.
    InProgress,
    /// Every question answered.
    Completed,
}

/// How one option of one question should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    /// The question has no answer yet.
    Unanswered,
    /// The answer key of an answered question.
    Correct,
    /// The chosen option, and it is wrong.
    Incorrect,
    /// The question is answered; this option is neither chosen nor the key.
    Other,
}

/// One quiz attempt.
///
/// Questions are fixed at load time. Each question takes exactly one answer
/// and the first answer is final. Score and progress are derived from the
/// answers on every read, never stored.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    questions: Vec<Question>,
    answers: BTreeMap<usize, String>,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole attempt with a fresh, unanswered one.
    pub fn load(&mut self, questions: Vec<Question>) {
        self.questions = questions;
        self.answers.clear();
    }

    /// Back to `Empty`.
    pub fn clear(&mut self) {
        self.questions.clear();
        self.answers.clear();
    }

    /// Record the answer for the question at `index`.
    ///
    /// Re-submitting an already answered question is a silent no-op; the
    /// stored answer never changes. An out-of-range index is a caller bug.
    pub fn submit_answer(&mut self, index: usize, option: &str) -> Result<()> {
        if index >= self.questions.len() {
            return Err(ShporaError::InvalidIndex {
                index,
                len: self.questions.len(),
            });
        }
        self.answers
            .entry(index)
            .or_insert_with(|| option.to_string());
        Ok(())
    }

    pub fn state(&self) -> QuizState {
        if self.questions.is_empty() {
            QuizState::Empty
        } else if self.answers.len() == self.questions.len() {
            QuizState::Completed
        } else {
            QuizState::InProgress
        }
    }

    /// Count of correctly answered questions.
    pub fn score(&self) -> usize {
        self.answers
            .iter()
            .filter(|(i, answer)| self.questions[**i].correct_option == **answer)
            .count()
    }

    /// Answered share of the quiz, 0.0 when no quiz is loaded.
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            0.0
        } else {
            self.answers.len() as f64 / self.questions.len() as f64
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.answers.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// How `option` of the question at `index` should be rendered given the
    /// current answers. Pure value comparison over the stored strings.
    pub fn classify_option(&self, index: usize, option: &str) -> OptionMark {
        let (Some(question), Some(chosen)) =
            (self.questions.get(index), self.answers.get(&index))
        else {
            return OptionMark::Unanswered;
        };

        if option == question.correct_option {
            OptionMark::Correct
        } else if option == chosen.as_str() {
            OptionMark::Incorrect
        } else {
            OptionMark::Other
        }
    }
}
