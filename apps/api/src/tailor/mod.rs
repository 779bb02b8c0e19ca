// CV Tailoring pipeline.
// Implements: template resolution, section drafting, batch application.
// All LLM calls go through llm_client; all document round-trips go through
// docs_client — nothing here talks to a backend directly.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
