// All LLM prompt constants for the Analysis module.

/// System instruction for reference-post analysis.
pub const ANALYSIS_SYSTEM: &str = "You are an expert social media algorithm analyst.";

/// Analysis prompt template. Replace `{reference_content}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Act as a world-class LinkedIn content strategist who studies why posts go viral.

Study the style, patterns and structure of the "Reference Post Content" below.
Name the hook type it opens with (e.g. "Contrarian", "Storytelling", "Listicle"),
the concrete formatting tricks it relies on (e.g. "One-line paragraphs", "Emoji bullet lists"),
its tone, and the keywords that drive engagement.
Estimate a "Virality Score" from 0-100 for how well it captures attention.

Reference Post Content:
"""{reference_content}""""#;
