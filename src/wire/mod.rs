use serde::{Deserialize, Serialize};

/// ========================================
/// Pipeline data model
/// ========================================

/// A user-defined rewriting style appended after the built-in categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleExtension {
    pub name: String,
    pub prompt: String,
}

impl StyleExtension {
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self { name: name.into(), prompt: prompt.into() }
    }
}

/// Everything the prompt builder needs for one invocation.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequestConfig {
    pub user_text: String,
    pub styles: Vec<StyleExtension>,
    pub unfiltered: bool,
}

/// What a provider receives: the built prompt plus the mode flags that
/// influence the HTTP payload (not the prompt text).
#[derive(Debug, Clone)]
pub struct GenerationCall {
    pub prompt: String,
    pub unfiltered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformationCard {
    pub title: String,
    pub content: String,
}

/// Parsed model reply. Substrings are raw model output; callers escape them
/// for whatever medium they render into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResult {
    pub critique: String,
    pub transformations: Vec<TransformationCard>,
}

impl ParsedResult {
    /// First card whose title matches `title`, ignoring case.
    pub fn find(&self, title: &str) -> Option<&TransformationCard> {
        self.transformations
            .iter()
            .find(|c| c.title.eq_ignore_ascii_case(title.trim()))
    }
}
