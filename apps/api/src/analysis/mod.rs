// Reference-post analysis: one structured LLM call that turns a pasted post
// into a ViralAnalysis. All LLM calls go through llm_client.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
