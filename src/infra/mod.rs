pub mod env;
pub mod llm;
pub mod secrets;
