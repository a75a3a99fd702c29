use crate::{
    quiz::QuizSession,
    types::{Summary, Transcript},
};

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

/// Format transcript segments with timestamps
pub fn format_transcript_with_timestamps(transcript: &Transcript) -> String {
    transcript
        .segments
        .iter()
        .map(|seg| format!("[{}] {}", format_timestamp(seg.start), seg.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a summary as printable markdown
pub fn format_summary_readable(summary: &Summary) -> String {
    let mut output = String::new();
    output.push_str("## Summary\n\n");
    output.push_str(summary.text.trim());
    output.push('\n');
    output
}

/// Format a quiz attempt as a readable results block
pub fn format_quiz_results(quiz: &QuizSession) -> String {
    let mut output = String::new();
    output.push_str(&format!("Score: {}/{}\n\n", quiz.score(), quiz.len()));

    for (i, question) in quiz.questions().iter().enumerate() {
        let verdict = match quiz.answer(i) {
            Some(answer) if answer == question.correct_option => "✓",
            Some(_) => "✗",
            None => "·",
        };
        output.push_str(&format!("{} {}\n", verdict, question.prompt));
        if let Some(answer) = quiz.answer(i) {
            if answer != question.correct_option {
                output.push_str(&format!(
                    "  answered: {} | correct: {}\n",
                    answer, question.correct_option
                ));
            }
        }
    }

    output
}
