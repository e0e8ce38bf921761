//! Fluent prompt builder

/// Builds a prompt string piece by piece
///
/// ```
/// use pricelens_core::prompts::PromptBuilder;
///
/// let prompt = PromptBuilder::new()
///     .text("Here are the search results:")
///     .blank_line()
///     .when_else(false, "...", "(nothing)")
///     .build();
/// assert_eq!(prompt, "Here are the search results:\n\n(nothing)");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    parts: Vec<String>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add text verbatim
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.parts.push(content.into());
        self
    }

    /// Add a newline
    pub fn newline(self) -> Self {
        self.text("\n")
    }

    /// Add a blank line (two newlines)
    pub fn blank_line(self) -> Self {
        self.text("\n\n")
    }

    /// Add `content` only when `condition` holds
    pub fn when(self, condition: bool, content: impl Into<String>) -> Self {
        if condition { self.text(content) } else { self }
    }

    /// Add one of two alternatives
    pub fn when_else(
        self,
        condition: bool,
        if_true: impl Into<String>,
        if_false: impl Into<String>,
    ) -> Self {
        if condition {
            self.text(if_true)
        } else {
            self.text(if_false)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(String::is_empty)
    }

    /// Join all parts
    pub fn build(self) -> String {
        self.parts.concat()
    }
}

impl From<PromptBuilder> for String {
    fn from(builder: PromptBuilder) -> Self {
        builder.build()
    }
}
