pub mod ollama;
pub mod prompt;

/// A language model that turns a prompt into raw text.
///
/// `None` means the model gave no answer (unreachable, timed out, refused).
/// Parsing and validating the text is the engine's job, not the backend's.
pub trait LanguageModel: Send + Sync {
    fn complete(&self, prompt: &str) -> Option<String>;
}

/// Returns the same canned response to every prompt.
pub struct MockLanguageModel {
    pub response: Option<String>,
}

impl MockLanguageModel {
    pub fn answering(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
        }
    }

    pub fn silent() -> Self {
        Self { response: None }
    }
}

impl LanguageModel for MockLanguageModel {
    fn complete(&self, _prompt: &str) -> Option<String> {
        self.response.clone()
    }
}
