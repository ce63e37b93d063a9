//! Generated output awaiting the quality decision.

/// Raw generation plus the quality gate's verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOutput {
    /// Generated text
    pub text: String,
    /// Whether the quality gate accepted it
    pub accepted: bool,
}

impl GeneratedOutput {
    /// Wrap freshly generated text that has not been judged yet.
    pub fn pending(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            accepted: false,
        }
    }

    /// Length in characters after trimming surrounding whitespace.
    ///
    /// ```
    /// use recap_core::GeneratedOutput;
    ///
    /// assert_eq!(GeneratedOutput::pending("  héllo \n").trimmed_len(), 5);
    /// ```
    pub fn trimmed_len(&self) -> usize {
        self.text.trim().chars().count()
    }
}
