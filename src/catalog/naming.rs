//! Display names derived from workflow filenames.

/// Turn `0_Webhook_to_Slack_automation.json` into
/// `Webhook To Slack Automation`.
///
/// A leading numeric token is treated as an ordinal prefix and dropped,
/// unless it is the only token.
pub fn name_from_filename(filename: &str, overrides: &[(String, String)]) -> String {
    let base = base_name(filename);
    let mut tokens: Vec<&str> = base.split('_').collect();

    if tokens.len() > 1 && is_numeric(tokens[0]) {
        tokens.remove(0);
    }

    tokens
        .into_iter()
        .filter(|t| !t.is_empty())
        .map(|t| format_token(t, overrides))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Filename with its final extension removed.
pub fn base_name(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(0) | None => filename,
        Some(dot) => &filename[..dot],
    }
}

/// Choose between the explicit title and the filename-derived one.
///
/// The explicit title wins when it is non-empty after trimming, differs
/// from the extension-stripped filename and does not start with a
/// placeholder prefix.
pub fn derive_name(
    filename: &str,
    explicit: Option<&str>,
    placeholder_prefixes: &[String],
    overrides: &[(String, String)],
) -> String {
    if let Some(title) = explicit {
        let trimmed = title.trim();
        let is_placeholder = placeholder_prefixes
            .iter()
            .any(|p| trimmed.starts_with(p.as_str()));
        if !trimmed.is_empty() && trimmed != base_name(filename) && !is_placeholder {
            return trimmed.to_string();
        }
    }
    name_from_filename(filename, overrides)
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

fn format_token(token: &str, overrides: &[(String, String)]) -> String {
    let lower = token.to_lowercase();
    if let Some((_, display)) = overrides.iter().find(|(k, _)| *k == lower) {
        return display.clone();
    }

    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
