//! One-shot agent endpoints: each wraps a single prompt template, an LLM
//! call, and a normalization pass with an agent-specific fallback payload.

pub mod contract;
pub mod docs;
pub mod prompts;
pub mod resume;
pub mod workflow;
