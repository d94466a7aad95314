// Resume processing: text extraction, AI structuring, validation, storage,
// bulk ingest with progress reporting, and interview-question generation.
// All LLM calls go through llm_client.

pub mod bulk;
pub mod extract;
pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod questions;
pub mod storage;
pub mod validation;
