use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub segments: Vec<Segment>,
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub text: String,
}

/// One multiple-choice question. Field names on the wire follow the
/// generation service's JSON: `question`, `options`, `answer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(rename = "answer")]
    pub correct_option: String,
}

impl Question {
    /// A usable question offers a choice, and its answer key is one of the options.
    pub fn is_well_formed(&self) -> bool {
        self.options.len() >= 2 && self.options.iter().any(|o| *o == self.correct_option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: &[&str], answer: &str) -> Question {
        Question {
            prompt: "What does the video cover?".to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_option: answer.to_string(),
        }
    }

    #[test]
    fn question_with_its_answer_among_options_is_well_formed() {
        assert!(question(&["A", "B", "C", "D"], "C").is_well_formed());
    }

    #[test]
    fn question_missing_its_answer_is_malformed() {
        assert!(!question(&["A", "B"], "C").is_well_formed());
    }

    #[test]
    fn question_with_a_single_option_is_malformed() {
        assert!(!question(&["A"], "A").is_well_formed());
    }

    #[test]
    fn question_decodes_from_the_service_field_names() {
        let json = r#"{"question":"Q1","options":["A","B"],"answer":"B"}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.prompt, "Q1");
        assert_eq!(q.options, vec!["A", "B"]);
        assert_eq!(q.correct_option, "B");
    }
}
