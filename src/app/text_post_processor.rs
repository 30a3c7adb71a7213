//! Best-effort detection of a Mermaid diagram inside generated text.
//!
//! This is a filter, not a parser: anything that does not look like a
//! well-formed diagram block falls through to [`ProcessedText::Plain`].

const FENCE: &str = "```";
const DIAGRAM_TAG: &str = "mermaid";
const COMMENT_PREFIXES: [&str; 2] = ["%%", "//"];

const ROOT_KEYWORDS: &[&str] = &[
    "graph",
    "flowchart",
    "sequenceDiagram",
    "classDiagram",
    "stateDiagram",
    "stateDiagram-v2",
    "erDiagram",
    "journey",
    "gantt",
    "pie",
    "gitGraph",
    "mindmap",
    "timeline",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessedText {
    /// Cleaned diagram source, ready to hand to a renderer.
    Diagram { source: String },
    /// The input, unchanged.
    Plain(String),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextPostProcessor;

impl TextPostProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn process(&self, text: &str) -> ProcessedText {
        match extract_diagram(text) {
            Some(source) => ProcessedText::Diagram { source },
            None => ProcessedText::Plain(text.to_string()),
        }
    }
}

fn extract_diagram(text: &str) -> Option<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines = normalized.lines();

    lines.by_ref().find(|line| is_diagram_fence(line))?;

    let mut body = Vec::new();
    let mut closed = false;
    for line in lines {
        if line.trim() == FENCE {
            closed = true;
            break;
        }
        let trimmed = line.trim_start();
        if COMMENT_PREFIXES.iter().any(|prefix| trimmed.starts_with(prefix)) {
            continue;
        }
        body.push(line);
    }
    if !closed {
        return None;
    }

    let source = body.join("\n").trim().to_string();
    let root = source.split_whitespace().next()?;
    ROOT_KEYWORDS.contains(&root).then_some(source)
}

fn is_diagram_fence(line: &str) -> bool {
    line.trim()
        .strip_prefix(FENCE)
        .is_some_and(|tag| tag.trim().eq_ignore_ascii_case(DIAGRAM_TAG))
}
