// Interview preparation: company research followed by question generation.
// Question generation calls go through llm_client only.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod questions;
pub mod research;
