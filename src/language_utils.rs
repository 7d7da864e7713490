use isolang::Language;

/// Language utilities for target-language tags
///
/// Providers get a human-readable language name in the prompt, so ISO codes
/// supplied on the command line are resolved through isolang first.
/// Resolve a language tag to an English language name for provider prompts.
///
/// Accepts ISO 639-1 (2-letter) and ISO 639-3 (3-letter) codes; anything else
/// is passed through verbatim, which covers callers who already supply a name
/// like "Persian".
pub fn resolve_language_name(tag: &str) -> String {
    let normalized = tag.trim().to_lowercase();

    if normalized.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized) {
            return lang.to_name().to_string();
        }
    } else if normalized.len() == 3 {
        if let Some(lang) = Language::from_639_3(&normalized) {
            return lang.to_name().to_string();
        }
    }

    tag.trim().to_string()
}

/// Whether a tag is a recognized ISO 639-1 or ISO 639-3 code
pub fn is_iso_code(tag: &str) -> bool {
    let normalized = tag.trim().to_lowercase();
    match normalized.len() {
        2 => Language::from_639_1(&normalized).is_some(),
        3 => Language::from_639_3(&normalized).is_some(),
        _ => false,
    }
}
