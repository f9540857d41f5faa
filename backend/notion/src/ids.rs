//! Notion object id helpers.

/// Canonicalises a page or database id copied from a Notion URL.
///
/// Dashes and whitespace are removed; a 32-character result is re-hyphenated
/// as 8-4-4-4-12. Anything else is returned trimmed but otherwise untouched.
pub fn normalize_notion_id(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();
    if cleaned.chars().count() != 32 || !cleaned.is_ascii() {
        return raw.trim().to_string();
    }
    format!(
        "{}-{}-{}-{}-{}",
        &cleaned[..8],
        &cleaned[8..12],
        &cleaned[12..16],
        &cleaned[16..20],
        &cleaned[20..]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphenates_compact_ids() {
        assert_eq!(
            normalize_notion_id("0123456789abcdef0123456789abcdef"),
            "01234567-89ab-cdef-0123-456789abcdef"
        );
    }

    #[test]
    fn reformats_already_dashed_ids() {
        assert_eq!(
            normalize_notion_id(" 01234567-89ab-cdef-0123-456789abcdef "),
            "01234567-89ab-cdef-0123-456789abcdef"
        );
    }

    #[test]
    fn leaves_other_lengths_alone() {
        assert_eq!(normalize_notion_id("  short-id "), "short-id");
        assert_eq!(normalize_notion_id(""), "");
    }
}
