const EDITOR_INSTRUCTION: &str = "The response is inserted directly into a code editor, so everything other than code must be written as code comments. \
Put explanations, documentation or clarifications in comments inside the code, and generate inline documentation comments when documentation is requested. \
When generating test cases, keep the original code. Otherwise do what the snippet below asks; it may itself contain a prompt.";

const CODE_ONLY_PREFIX: &str = "Only provide the code for the following task: ";

/// How a snippet is wrapped before it is sent as a provider prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    /// Send the snippet unchanged.
    Raw,
    /// Ask for code with any prose rendered as comments.
    EditorInstruction,
    /// Ask for code only.
    CodeOnly,
}

pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build(template: PromptTemplate, snippet: &str) -> String {
        match template {
            PromptTemplate::Raw => snippet.to_string(),
            PromptTemplate::EditorInstruction => format!("{EDITOR_INSTRUCTION}\nTask: {snippet}"),
            PromptTemplate::CodeOnly => format!("{CODE_ONLY_PREFIX}{snippet}"),
        }
    }
}
