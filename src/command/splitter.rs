//! Batch-instruction splitting
//!
//! A single instruction shaped like "Add 3 tasks: ...; ...; ..." is split
//! into one sub-instruction per statement, each re-prefixed with the verb,
//! before any inference call is made. Anything else passes through as one
//! instruction.

const BATCH_VERBS: [&str; 3] = ["add", "delete", "edit"];

/// Split an instruction into independently-processed sub-instructions
///
/// Returns the trimmed instruction unchanged unless it carries a leading
/// "<Add|Delete|Edit> N task(s):" marker, in which case the remainder is
/// split on semicolons and line breaks.
pub fn split_instruction(instruction: &str) -> Vec<String> {
    let Some((verb, declared, body)) = batch_marker(instruction) else {
        return vec![instruction.trim().to_string()];
    };

    let pieces: Vec<String> = body
        .split(['\n', ';'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            if starts_with_verb(p) {
                p.to_string()
            } else {
                format!("{verb} {p}")
            }
        })
        .collect();

    if pieces.is_empty() {
        return vec![instruction.trim().to_string()];
    }
    if pieces.len() != declared {
        tracing::debug!(
            declared,
            found = pieces.len(),
            "batch marker count does not match statement count"
        );
    }
    pieces
}

/// Detect a leading "<verb> N task(s):" marker, returning the verb as
/// typed, the declared count, and the statement body after the marker
fn batch_marker(instruction: &str) -> Option<(String, usize, String)> {
    let trimmed = instruction.trim();
    let (first, rest) = trimmed.split_once(char::is_whitespace)?;
    if !BATCH_VERBS.contains(&first.to_lowercase().as_str()) {
        return None;
    }

    let rest = rest.trim_start();
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let declared: usize = digits.parse().ok()?;

    let rest = rest[digits.len()..].trim_start();
    let word_len = if rest.get(..5).is_some_and(|w| w.eq_ignore_ascii_case("tasks")) {
        5
    } else if rest.get(..4).is_some_and(|w| w.eq_ignore_ascii_case("task")) {
        4
    } else {
        return None;
    };

    let body = rest[word_len..].trim_start();
    let body = body.strip_prefix(':').unwrap_or(body);
    Some((first.to_string(), declared, body.trim().to_string()))
}

fn starts_with_verb(piece: &str) -> bool {
    let lower = piece.to_lowercase();
    BATCH_VERBS.iter().any(|verb| {
        lower
            .strip_prefix(verb)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    })
}
