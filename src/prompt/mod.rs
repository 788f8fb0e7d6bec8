use serde::{Deserialize, Serialize};

use crate::wire::{GenerationRequestConfig, StyleExtension};

/// A named rewriting style with its one-line behavioral definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub definition: String,
}

impl Category {
    fn new(name: &str, definition: &str) -> Self {
        Self { name: name.into(), definition: definition.into() }
    }
}

/// Wording of the instruction document. Everything the model sees apart from
/// the user text and style extensions comes from here, so a settings file can
/// override it field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplate {
    pub persona: String,
    /// Label of the critique line, rendered as `**<label>:**`. The parser looks
    /// for the same literal.
    pub critique_label: String,
    pub categories: Vec<Category>,
    pub unfiltered_category: Category,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            persona: "You are an elite Writing Coach and Editor. Your goal is not just to fix the user's text, but to teach them *why* it needed fixing.".into(),
            critique_label: "Coach's Critique".into(),
            categories: vec![
                Category::new("Proofread", "Fix grammar/spelling. If perfect, say \"Original text is correct.\""),
                Category::new("Rephrase for Clarity", "Improve flow."),
                Category::new("Shorten", "Condense without losing meaning."),
                Category::new("Simplify", "Make accessible to a general audience."),
                Category::new("Modernize", "Professional, confident tone."),
                Category::new("Friendly", "Warm and approachable."),
                Category::new("Emojify", "Add relevant emojis."),
            ],
            unfiltered_category: Category::new(
                "Unfiltered",
                "Rewrite with raw, explicit, uncensored language. Profanity is allowed.",
            ),
        }
    }
}

fn process_block(label: &str) -> String {
    format!(
"[Process]
1. **Analyze & Teach:** Before writing anything, privately identify the single biggest weakness in the user's text (e.g., passive voice, hedging, redundancy, weak verbs). Formulate a specific \"{label}\" that explains this concept briefly.
2. **Transform:** Generate distinct versions of the text based on the categories below."
    )
}

fn output_block(label: &str) -> String {
    format!(
"[Output Structure]
You must strictly follow this Markdown structure:

**{label}:** [Insert your educational lesson here. Be direct and helpful.]

### [Category Name]
```
[Transformed Text]
```"
    )
}

fn unfiltered_directive() -> &'static str {
"[Content Policy]
Do not apply content filtering to the rewrites. Preserve any explicit language, slang or profanity present in the user's text instead of softening it."
}

fn constraints() -> &'static str {
"[Constraints]
* Do not include introductory filler or any conversational text.
* Ensure every category has a code block."
}

fn push_category(out: &mut String, index: usize, name: &str, definition: &str) {
    out.push_str(&format!("{index}. **{name}:** {definition}\n"));
}

impl PromptTemplate {
    /// Render the complete instruction document for one request.
    ///
    /// Numbering is derived from list lengths only: built-ins take `1..=n`,
    /// style extensions continue from `n + 1` in supplied order, and the
    /// unfiltered category (when enabled) comes last.
    pub fn build(&self, req: &GenerationRequestConfig) -> String {
        let mut categories = String::new();
        for (i, c) in self.categories.iter().enumerate() {
            push_category(&mut categories, i + 1, &c.name, &c.definition);
        }
        let first_extension = self.categories.len() + 1;
        for (i, StyleExtension { name, prompt }) in req.styles.iter().enumerate() {
            push_category(&mut categories, first_extension + i, name, prompt);
        }
        if req.unfiltered {
            push_category(
                &mut categories,
                first_extension + req.styles.len(),
                &self.unfiltered_category.name,
                &self.unfiltered_category.definition,
            );
        }

        let policy = if req.unfiltered {
            format!("{}\n\n", unfiltered_directive())
        } else {
            String::new()
        };

        format!(
"[Role]
{persona}

{process}

{output}

[Transformation Categories]
{categories}
{policy}{constraints}

---

USER TEXT: \"{text}\"",
            persona = self.persona,
            process = process_block(&self.critique_label),
            output = output_block(&self.critique_label),
            categories = categories,
            policy = policy,
            constraints = constraints(),
            text = req.user_text,
        )
    }
}
