// Free-form document writer: letters, proposals, emails, memos, short reports and SOPs.
// Same LLM boundary as report generation, different prompts.

pub mod handlers;
pub mod prompts;
