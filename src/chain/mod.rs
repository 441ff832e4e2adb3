//! Three-phase reasoning chain executed against a single chat provider.
//!
//! Phase 1 asks the model to break the prompt into a short numbered list of
//! reasoning steps. Phase 2 answers each step in order, feeding the growing
//! context into every subsequent call. Phase 3 asks the model to synthesize a
//! final answer from the full context. The phases are strictly sequential:
//! each step's answer is part of the context the next step sees, so the loop
//! must not be parallelized.

use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, ChatProvider};
use crate::error::ChainError;

/// Maximum number of reasoning steps answered and recorded per run.
///
/// Steps generated beyond this cap are dropped without any signal to the
/// caller: no error, no truncation notice.
pub const MAX_RECORDED_STEPS: usize = 10;

/// A reasoning step paired with the text produced by answering it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Short step label, as extracted from the model's numbered list
    pub step: String,
    /// The model's answer for this step
    pub reasoning: String,
}

/// Result of a full chain run.
#[derive(Debug, Clone)]
pub struct ChainOutcome {
    /// The synthesized final answer
    pub answer: String,
    /// One record per answered step, in the order they were answered
    pub steps: Vec<StepRecord>,
}

/// Extracts step labels from a numbered-list response.
///
/// Splits the response on line breaks and keeps lines whose trimmed form
/// starts with one or more digits followed by a period, stripping that prefix
/// and surrounding whitespace. Non-matching lines are discarded. Each physical
/// line is evaluated independently, so a numbered item that wraps onto a
/// second line loses its continuation.
pub fn parse_steps(response: &str) -> Vec<String> {
    response
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
            if digits == 0 {
                return None;
            }
            let rest = trimmed[digits..].strip_prefix('.')?;
            Some(rest.trim().to_string())
        })
        .collect()
}

/// Runs the generate/answer/synthesize sequence over a chat provider.
pub struct ReasoningChain<'a> {
    provider: &'a dyn ChatProvider,
    max_steps: usize,
}

impl<'a> ReasoningChain<'a> {
    /// Creates a new chain over the given provider with the default step cap.
    pub fn new(provider: &'a dyn ChatProvider) -> Self {
        Self {
            provider,
            max_steps: MAX_RECORDED_STEPS,
        }
    }

    /// Overrides the maximum number of steps answered and recorded.
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Executes all three phases and returns the final answer with the step
    /// trail.
    ///
    /// A failure in any phase aborts the run; nothing computed by earlier
    /// phases is returned.
    pub async fn run(&self, prompt: &str) -> Result<ChainOutcome, ChainError> {
        let steps = self.generate_steps(prompt).await?;
        log::info!("generated {} reasoning step(s)", steps.len());

        let mut context = prompt.to_string();
        let mut records: Vec<StepRecord> = Vec::new();

        for step in steps {
            let reasoning = self
                .ask(format!("{context}\n\nReasoning step: {step}"))
                .await?;
            context.push_str(&format!("\n\nStep: {step}\nReasoning: {reasoning}"));
            records.push(StepRecord { step, reasoning });

            if records.len() >= self.max_steps {
                break;
            }
        }

        let answer = self.synthesize(&context).await?;
        log::info!("synthesized answer from {} step(s)", records.len());

        Ok(ChainOutcome {
            answer,
            steps: records,
        })
    }

    /// Phase 1: asks the model for 3-5 numbered reasoning steps and parses
    /// them out of the response.
    async fn generate_steps(&self, prompt: &str) -> Result<Vec<String>, ChainError> {
        let instruction = format!(
            "You are an AI assistant designed to break down complex problems into reasoning steps.\n\
            For the following prompt, generate 3-5 reasoning steps that will help in solving the problem:\n\
            \n\
            {prompt}\n\
            \n\
            Output the steps as a numbered list."
        );
        let response = self.ask(instruction).await?;
        Ok(parse_steps(&response))
    }

    /// Phase 3: asks the model for one coherent answer over the accumulated
    /// context.
    async fn synthesize(&self, context: &str) -> Result<String, ChainError> {
        let instruction = format!(
            "Based on the following reasoning steps and information, please provide a clear, concise, and accurate final answer:\n\
            \n\
            {context}\n\
            \n\
            Synthesize the key points and insights into a coherent response."
        );
        self.ask(instruction).await
    }

    async fn ask(&self, prompt: String) -> Result<String, ChainError> {
        let messages = [ChatMessage::user().content(prompt).build()];
        self.provider.chat(&messages).await
    }
}
