//! Immutable transcript state and message segmentation for chat front-ends.
//!
//! A front-end keeps a scrolling transcript, a panel of answered reasoning
//! steps and a busy flag while a request is in flight. Instead of an ambient
//! mutable store, the transcript here is a value: each request lifecycle
//! event (submitted, succeeded, failed) consumes the old state and returns a
//! new one.

use crate::chain::StepRecord;

/// Fixed message shown in place of an answer when a request fails.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing your request.";

/// Who produced a transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

/// One turn in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub content: String,
}

/// A piece of message content ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain text, rendered as a paragraph
    Paragraph(String),
    /// Fenced code block; `language` is the first line inside the fence
    Code { language: String, body: String },
}

/// Splits message content on fenced code-block delimiters.
///
/// Text between a pair of ``` fences becomes a [`Segment::Code`] whose
/// language tag is the first line inside the fence and whose body is the
/// remaining lines. Everything else, including an unclosed trailing fence,
/// stays plain text.
pub fn split_segments(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = content;

    while let Some(open) = rest.find("```") {
        let after_open = &rest[open + 3..];
        let Some(close) = after_open.find("```") else {
            break;
        };
        if open > 0 {
            segments.push(Segment::Paragraph(rest[..open].to_string()));
        }
        let fenced = &after_open[..close];
        let (language, body) = fenced.split_once('\n').unwrap_or((fenced, ""));
        segments.push(Segment::Code {
            language: language.to_string(),
            body: body.to_string(),
        });
        rest = &after_open[close + 3..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Paragraph(rest.to_string()));
    }
    segments
}

/// Chat transcript plus request-in-flight bookkeeping.
///
/// Nothing here persists anywhere; dropping the value drops the history.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    steps: Vec<StepRecord>,
    pending: Option<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns rendered so far, oldest first.
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Step panel contents from the most recent successful exchange.
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// True while a request is in flight; the send action stays disabled.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Records that a prompt was submitted and a request is now in flight.
    pub fn submit(mut self, prompt: impl Into<String>) -> Self {
        self.pending = Some(prompt.into());
        self
    }

    /// Applies a successful response: the pending prompt and the answer are
    /// appended as turns and the step panel is replaced.
    pub fn succeed(mut self, answer: impl Into<String>, steps: Vec<StepRecord>) -> Self {
        if let Some(prompt) = self.pending.take() {
            self.entries.push(TranscriptEntry {
                speaker: Speaker::User,
                content: prompt,
            });
            self.entries.push(TranscriptEntry {
                speaker: Speaker::Assistant,
                content: answer.into(),
            });
            self.steps = steps;
        }
        self
    }

    /// Applies a failure: the generic error message stands in for the answer
    /// and the step panel keeps its previous contents.
    pub fn fail(mut self) -> Self {
        if let Some(prompt) = self.pending.take() {
            self.entries.push(TranscriptEntry {
                speaker: Speaker::User,
                content: prompt,
            });
            self.entries.push(TranscriptEntry {
                speaker: Speaker::Assistant,
                content: GENERIC_ERROR_MESSAGE.to_string(),
            });
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_single_paragraph() {
        let segments = split_segments("just some prose");
        assert_eq!(
            segments,
            vec![Segment::Paragraph("just some prose".to_string())]
        );
    }

    #[test]
    fn fenced_block_splits_into_paragraph_code_paragraph() {
        let segments = split_segments("before\n```rust\nlet x = 1;\n```\nafter");
        assert_eq!(
            segments,
            vec![
                Segment::Paragraph("before\n".to_string()),
                Segment::Code {
                    language: "rust".to_string(),
                    body: "let x = 1;\n".to_string(),
                },
                Segment::Paragraph("\nafter".to_string()),
            ]
        );
    }

    #[test]
    fn unclosed_fence_stays_plain_text() {
        let segments = split_segments("text with ```rust\nlet x = 1;");
        assert_eq!(
            segments,
            vec![Segment::Paragraph(
                "text with ```rust\nlet x = 1;".to_string()
            )]
        );
    }

    #[test]
    fn fence_without_newline_has_empty_body() {
        let segments = split_segments("```rust```");
        assert_eq!(
            segments,
            vec![Segment::Code {
                language: "rust".to_string(),
                body: String::new(),
            }]
        );
    }

    #[test]
    fn submit_marks_the_transcript_busy() {
        let transcript = Transcript::new().submit("hello");
        assert!(transcript.is_busy());
        assert!(transcript.entries().is_empty());
    }

    #[test]
    fn success_appends_both_turns_and_replaces_steps() {
        let steps = vec![StepRecord {
            step: "Think".to_string(),
            reasoning: "thought".to_string(),
        }];
        let transcript = Transcript::new()
            .submit("a question")
            .succeed("an answer", steps.clone());

        assert!(!transcript.is_busy());
        assert_eq!(
            transcript.entries(),
            &[
                TranscriptEntry {
                    speaker: Speaker::User,
                    content: "a question".to_string(),
                },
                TranscriptEntry {
                    speaker: Speaker::Assistant,
                    content: "an answer".to_string(),
                },
            ]
        );
        assert_eq!(transcript.steps(), steps.as_slice());
    }

    #[test]
    fn failure_substitutes_the_generic_message_and_keeps_steps() {
        let steps = vec![StepRecord {
            step: "Think".to_string(),
            reasoning: "thought".to_string(),
        }];
        let transcript = Transcript::new()
            .submit("first")
            .succeed("fine", steps.clone())
            .submit("second")
            .fail();

        assert!(!transcript.is_busy());
        assert_eq!(transcript.entries().len(), 4);
        assert_eq!(
            transcript.entries()[3].content,
            GENERIC_ERROR_MESSAGE
        );
        // The step panel is untouched by a failed exchange.
        assert_eq!(transcript.steps(), steps.as_slice());
    }

    #[test]
    fn lifecycle_events_without_a_pending_prompt_are_ignored() {
        let transcript = Transcript::new().succeed("orphan", Vec::new()).fail();
        assert!(transcript.entries().is_empty());
        assert!(transcript.steps().is_empty());
    }
}
