pub mod config;
pub mod progressive;
pub mod selection;
pub mod snippet_source;
pub mod suggestion_service;
pub mod text_post_processor;

pub use config::SuggestionConfig;
pub use progressive::{progressive_chunks, render_progressively};
pub use selection::{LineSelection, SelectionError};
pub use snippet_source::{InputError, Resolved, SnippetSource};
pub use suggestion_service::SuggestionService;
pub use text_post_processor::{ProcessedText, TextPostProcessor};
