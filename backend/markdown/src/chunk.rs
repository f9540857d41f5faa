//! Run-length chunking.
//!
//! Notion caps each rich-text content string (2000 characters by default).
//! Longer strings become several sibling runs with the same styling.

/// Split `text` into consecutive pieces of at most `limit` characters.
///
/// Counts Unicode scalar values and never splits inside one. An empty input
/// yields no pieces. A `limit` of zero is treated as one.
pub fn chunk(text: &str, limit: usize) -> Vec<&str> {
    let limit = limit.max(1);
    let mut pieces = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let cut = rest
            .char_indices()
            .nth(limit)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(cut);
        pieces.push(head);
        rest = tail;
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_no_pieces() {
        assert!(chunk("", 2000).is_empty());
    }

    #[test]
    fn splits_at_limit() {
        let text = "a".repeat(2500);
        let pieces = chunk(&text, 2000);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].len(), 2000);
        assert_eq!(pieces[1].len(), 500);
        assert_eq!(pieces.concat(), text);
    }

    #[test]
    fn exact_multiple_has_no_empty_tail() {
        let text = "b".repeat(4000);
        assert_eq!(chunk(&text, 2000).len(), 2);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "é".repeat(5);
        let pieces = chunk(&text, 2);
        assert_eq!(pieces, vec!["éé", "éé", "é"]);
    }

    #[test]
    fn zero_limit_still_progresses() {
        assert_eq!(chunk("abc", 0), vec!["a", "b", "c"]);
    }
}
