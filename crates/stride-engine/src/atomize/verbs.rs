//! Verb-led step titles.

/// Titles must open with one of these.
pub const ACTION_VERBS: &[&str] = &[
    "add", "analyze", "ask", "book", "buy", "call", "check", "clean", "collect", "complete",
    "compile", "confirm", "contact", "create", "debug", "decide", "define", "deploy", "design",
    "discuss", "document", "download", "draft", "edit", "email", "estimate", "file", "fill",
    "finalize", "find", "finish", "fix", "gather", "identify", "implement", "install", "list",
    "make", "meet", "organize", "outline", "pay", "plan", "prepare", "print",
    "proofread", "publish", "read", "reply", "request", "research", "review", "revise", "run",
    "schedule", "send", "set", "share", "sign", "sketch", "submit", "summarize", "test", "update",
    "upload", "verify", "write",
];

/// Whether `title` already opens with an action verb.
#[must_use]
pub fn starts_with_verb(title: &str) -> bool {
    title
        .split_whitespace()
        .next()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .is_some_and(|word| ACTION_VERBS.contains(&word.as_str()))
}

/// Guess a verb from keywords in the title.
#[must_use]
pub fn infer_verb(title: &str) -> &'static str {
    let lowered = title.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lowered.contains(w));
    if has(&["email", "message"]) {
        "Send"
    } else if has(&["meeting", "call"]) {
        "Schedule"
    } else if has(&["report", "document"]) {
        "Write"
    } else if has(&["bug", "issue"]) {
        "Fix"
    } else if has(&["test"]) {
        "Run"
    } else {
        "Complete"
    }
}

/// Rewrite `title` so it opens with a capitalised action verb, prepending an
/// inferred one when needed.
#[must_use]
pub fn enforce_verb(title: &str) -> String {
    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
    if starts_with_verb(&title) {
        return capitalize_first(&title);
    }
    let verb = infer_verb(&title);
    if title.is_empty() {
        return verb.to_string();
    }
    format!("{verb} {}", lowercase_first_unless_acronym(&title))
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

/// "Quarterly report" -> "quarterly report", but "API docs" stays as is.
fn lowercase_first_unless_acronym(text: &str) -> String {
    let mut chars = text.chars();
    match (chars.next(), chars.clone().next()) {
        (Some(first), Some(second)) if second.is_lowercase() => {
            first.to_lowercase().chain(chars).collect()
        }
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("draft the outline", "Draft the outline")]
    #[case("Write intro section", "Write intro section")]
    #[case("Review: numbers", "Review: numbers")]
    #[case("Quarterly report numbers", "Write quarterly report numbers")]
    #[case("email to finance", "Email to finance")]
    #[case("Message for the team", "Send message for the team")]
    #[case("Kickoff meeting", "Schedule kickoff meeting")]
    #[case("Login bug", "Fix login bug")]
    #[case("Integration tests", "Run integration tests")]
    #[case("Slides", "Complete slides")]
    #[case("API docs", "Complete API docs")]
    #[case("", "Complete")]
    fn titles_become_verb_led(#[case] input: &str, #[case] expected: &str) {
        let out = enforce_verb(input);
        assert_eq!(out, expected);
        assert!(starts_with_verb(&out), "{out}");
    }
}
