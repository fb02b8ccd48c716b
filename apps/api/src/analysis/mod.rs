// Resume/job matching: deterministic text analysis, feedback synthesis, the
// insight prompt, and the pipeline tying them to the collaborators.
// All LLM calls go through llm_client — no direct Gemini calls here.

pub mod analyzer;
pub mod feedback;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
