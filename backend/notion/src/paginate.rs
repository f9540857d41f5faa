//! Request batching.

use std::slice::Chunks;

use notionforge_markdown::MAX_CHILDREN;

/// Splits `items` into consecutive batches the Notion API will accept.
///
/// `batch_size` is clamped to `1..=MAX_CHILDREN`.
pub fn paginate<T>(items: &[T], batch_size: usize) -> Chunks<'_, T> {
    items.chunks(batch_size.clamp(1, MAX_CHILDREN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notionforge_markdown::{segment, Block};

    #[test]
    fn splits_150_bullets_into_100_and_50() {
        let markdown: Vec<String> = (0..150).map(|n| format!("- item {n}")).collect();
        let blocks = segment(&markdown.join("\n"));
        let sizes: Vec<usize> = paginate(&blocks, 100).map(<[Block]>::len).collect();
        assert_eq!(sizes, vec![100, 50]);
    }

    #[test]
    fn exact_multiple_has_no_empty_batch() {
        let items = vec![0u8; 200];
        assert_eq!(paginate(&items, 100).count(), 2);
    }

    #[test]
    fn oversized_batch_is_clamped() {
        let items = vec![0u8; 250];
        let sizes: Vec<usize> = paginate(&items, 500).map(<[u8]>::len).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
    }

    #[test]
    fn empty_input_has_no_batches() {
        let items: Vec<u8> = Vec::new();
        assert_eq!(paginate(&items, 100).count(), 0);
    }
}
