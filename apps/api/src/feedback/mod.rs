// Interview feedback: report model, assembly of scoring replies, progress across reports.
// Scoring calls go through llm_client's TextCompletion seam only.

pub mod assembly;
pub mod handlers;
pub mod progress;
pub mod prompts;
pub mod report;
pub mod scorer;
