//! Code Block Language Resolution
//!
//! Maps the info string after an opening fence to a Notion code language.

/// Language used when a fence carries no info string.
pub const PLAIN_TEXT: &str = "plain text";

/// Short tags normalised to the names Notion expects.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("ts", "typescript"),
    ("py", "python"),
    ("rb", "ruby"),
    ("yml", "yaml"),
    ("sh", "shell"),
    ("bash", "shell"),
    ("zsh", "shell"),
];

/// Resolves a fence info string. Unknown tags pass through verbatim.
pub fn resolve_language(tag: &str) -> String {
    let tag = tag.trim();
    if tag.is_empty() {
        return PLAIN_TEXT.to_string();
    }
    let lowered = tag.to_lowercase();
    LANGUAGE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, language)| (*language).to_string())
        .unwrap_or_else(|| tag.to_string())
}
