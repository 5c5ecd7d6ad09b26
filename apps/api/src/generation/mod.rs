// Style-mimicking post generation from a ViralAnalysis and a new topic.
// All LLM calls go through llm_client; no direct provider calls here.

pub mod generator;
pub mod handlers;
pub mod prompts;
