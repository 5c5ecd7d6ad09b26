// All LLM prompt constants for the Generation module.

/// System instruction for style-mimicking post generation.
pub const GENERATION_SYSTEM: &str = "You are an expert ghostwriter who mimics styles perfectly. \
    You never add your own flair, you only mirror the reference.";

/// Generation prompt template.
/// Replace: {original_content}, {hook_strategy}, {tone}, {formatting},
///          {topic}, {current_date_time}
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"Act as a world-class LinkedIn ghostwriter.

Write a new LinkedIn post about the "Target Topic" below.
You must STRICTLY mimic the style, structure, spacing and tone of the "Reference Post".

REFERENCE POST (the template to mimic):
"""
{original_content}
"""

ANALYSIS OF REFERENCE (for context):
- Hook Strategy: {hook_strategy}
- Tone: {tone}
- Formatting: {formatting}

HARD RULES:
1. Visual mimicry: if the reference uses one-line paragraphs, so do you. Copy its list style exactly.
2. Hook replication: open with a hook that mirrors the psychological trigger and sentence structure of the reference hook, applied to the new topic.
3. Formatting: use the exact same formatting (bolding, emojis, spacing) as the reference.
4. Length: keep the word count and pacing very close to the reference.

TARGET TOPIC:
"""{topic}"""

CONTEXT:
Current Date/Time: {current_date_time}

Explain why the new post works and advise on the best time to post it."#;
