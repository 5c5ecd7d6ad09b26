// Shared prompt-building utilities.
// Each procedure that needs LLM calls defines its own prompts.rs alongside it.

/// Fills `{name}` placeholders in `template` in a single pass.
///
/// Substituted values are copied verbatim and never re-scanned, so user text
/// that happens to contain `{topic}` stays as written. Unknown placeholders
/// and lone braces are left untouched.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let replacement = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_known_placeholders() {
        let filled = fill_template("Hi {name}, about {topic}.", &[("name", "Ada"), ("topic", "Rust")]);
        assert_eq!(filled, "Hi Ada, about Rust.");
    }

    #[test]
    fn test_values_are_not_re_expanded() {
        let filled = fill_template(
            "REF: {reference}\nTOPIC: {topic}",
            &[("reference", "use {topic} here"), ("topic", "cats")],
        );
        assert_eq!(filled, "REF: use {topic} here\nTOPIC: cats");
    }

    #[test]
    fn test_unknown_placeholders_and_braces_survive() {
        let filled = fill_template("{\"a\": {missing}} {x", &[("x", "y")]);
        assert_eq!(filled, "{\"a\": {missing}} {x");
    }

    #[test]
    fn test_repeated_placeholder() {
        let filled = fill_template("{w} and {w}", &[("w", "again")]);
        assert_eq!(filled, "again and again");
    }
}
