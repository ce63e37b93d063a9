//! Summarization prompt template.

use crate::CompletionRequest;
use serde::{Deserialize, Serialize};

const DEFAULT_VERSION: &str = "meeting-summary-v1";

const DEFAULT_SYSTEM: &str = "You are an assistant that writes concise, factual summaries of \
meeting transcripts. Report decisions, action items with their owners, and open questions. \
Do not invent details that are not in the transcript.";

const DEFAULT_TEMPLATE: &str = "Summarize the following meeting transcript.\n\n\
Transcript:\n{transcript}\n\n\
Write a short overview paragraph followed by bullet lists of decisions and action items.";

const PLACEHOLDER: &str = "{transcript}";

/// Versioned prompt used for every generation.
///
/// The version tag is written to the persisted row and attached to audit
/// events, so edits to the wording should come with a new version.
///
/// # Examples
///
/// ```
/// use recap_core::PromptTemplate;
///
/// let template = PromptTemplate::default();
/// let prompt = template.render("Alice: ship it on Friday.");
/// assert!(prompt.contains("ship it on Friday"));
/// assert_eq!(template.version(), "meeting-summary-v1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    version: String,
    system: String,
    template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            system: DEFAULT_SYSTEM.to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplate {
    /// Custom template. `template` must contain `{transcript}`; if it does
    /// not, the transcript is appended after a blank line.
    pub fn new(
        version: impl Into<String>,
        system: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            system: system.into(),
            template: template.into(),
        }
    }

    /// Default wording under a different version tag.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }

    /// Version tag.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// System instructions.
    pub fn system(&self) -> &str {
        &self.system
    }

    /// Render the user prompt for a transcript.
    pub fn render(&self, transcript: &str) -> String {
        if self.template.contains(PLACEHOLDER) {
            self.template.replace(PLACEHOLDER, transcript)
        } else {
            format!("{}\n\n{}", self.template, transcript)
        }
    }

    /// Completion request for a transcript with the given model settings.
    pub fn request(
        &self,
        transcript: &str,
        model: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> CompletionRequest {
        CompletionRequest {
            prompt: self.render(transcript),
            system_prompt: Some(self.system.clone()),
            model: model.to_string(),
            temperature,
            max_tokens,
        }
    }
}
