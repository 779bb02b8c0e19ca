// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment enforcing plain-prose output: drafted section
/// text is inserted into the document verbatim, so stray formatting chatter
/// would end up in the CV.
pub const PLAIN_TEXT_SYSTEM: &str = "You are an expert CV writer. \
    Respond with the drafted text ONLY. \
    Do NOT include headings, markdown, code fences, or commentary. \
    Do NOT include preamble like 'Here is' or closing remarks.";

/// Common instruction appended to all drafting prompts.
pub const FACTUAL_INSTRUCTION: &str = "\
    CRITICAL: Do NOT invent employers, dates, credentials, or metrics. \
    Rephrase and emphasize only what the candidate background and the job \
    description actually support.";
