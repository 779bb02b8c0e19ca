// All LLM prompt constants for the Tailoring module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Headline prompt template. Replace `{template}` and `{jd_text}`.
pub const HEADLINE_PROMPT_TEMPLATE: &str = "\
Write a one-paragraph CV headline for a {template} role. \
Keep the candidate's signature accomplishments intact and tie their core \
strength to this job.

JOB DESCRIPTION:
{jd_text}";

/// Skills prompt template. Replace `{jd_text}`.
pub const SKILLS_PROMPT_TEMPLATE: &str = "\
List bullet skills keyed to this job description. Include the candidate's \
key strengths but avoid stuffing every keyword. One skill per line, no \
bullet glyphs.

JOB DESCRIPTION:
{jd_text}";

/// Highlights prompt template. Replace `{jd_text}`.
pub const HIGHLIGHTS_PROMPT_TEMPLATE: &str = "\
Write 3 standout highlights (3-5 lines each). Tie accomplishments to the \
role. Separate highlights with a blank line.

JOB DESCRIPTION:
{jd_text}";

/// Cover letter prompt template. Replace `{template}` and `{jd_text}`.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = "\
Draft a 200-word cover letter. Integrate the candidate's background as a \
{template}. Use the job description:
{jd_text}";

/// Fills `{template}` and `{jd_text}` into a prompt template and appends
/// the factual guardrail.
pub fn fill(template_const: &str, template_key: &str, jd_text: &str) -> String {
    format!(
        "{}\n\n{}",
        template_const
            .replace("{template}", template_key)
            .replace("{jd_text}", jd_text),
        crate::llm_client::prompts::FACTUAL_INSTRUCTION,
    )
}
