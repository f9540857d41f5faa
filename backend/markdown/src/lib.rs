//! Markdown to Notion block transcoder.
//!
//! Converts free-form markdown (typically an LLM response copied out of a chat
//! UI) into Notion blocks with inline rich-text runs, ready to be posted as
//! page children. Conversion is total: every input yields a block list.

pub mod chunk;
pub mod code_block;
pub mod converter;
pub mod inline;
pub mod ir;
pub mod segmenter;

pub use chunk::chunk;
pub use code_block::{resolve_language, PLAIN_TEXT};
pub use converter::{ConvertOptions, Converter, DEFAULT_CHUNK_LIMIT, DEFAULT_MAX_DEPTH};
pub use ir::{Block, StyleSet, TextRun, MAX_CHILDREN};
pub use segmenter::strip_trailing_markers;

/// Segments `markdown` with default options.
pub fn segment(markdown: &str) -> Vec<Block> {
    Converter::default().segment(markdown)
}

/// Parses inline spans with default options.
pub fn parse_spans(text: &str, inherited: StyleSet) -> Vec<TextRun> {
    Converter::default().parse_spans(text, inherited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn document_serialises_to_notion_children() {
        let blocks = segment("# Title\n\n- [x] **done**\n> quote\n---");
        let value = serde_json::to_value(&blocks).unwrap();
        assert_eq!(
            value,
            json!([
                {
                    "object": "block",
                    "type": "heading_1",
                    "heading_1": {"rich_text": [{"type": "text", "text": {"content": "Title"}}]}
                },
                {
                    "object": "block",
                    "type": "to_do",
                    "to_do": {
                        "rich_text": [{
                            "type": "text",
                            "text": {"content": "done"},
                            "annotations": {"bold": true}
                        }],
                        "checked": true
                    }
                },
                {
                    "object": "block",
                    "type": "callout",
                    "callout": {
                        "rich_text": [],
                        "icon": {"type": "emoji", "emoji": "💡"},
                        "children": [{
                            "object": "block",
                            "type": "paragraph",
                            "paragraph": {"rich_text": [{"type": "text", "text": {"content": "quote"}}]}
                        }]
                    }
                },
                {"object": "block", "type": "divider", "divider": {}}
            ])
        );
    }

    #[test]
    fn span_contents_rebuild_text_without_matched_delimiters() {
        let cases = [
            ("a **b** c", "a b c"),
            ("x *y* `z` ~~w~~", "x y z w"),
            ("[t](u) and $e$", "t and e"),
            ("**open and *close", "**open and *close"),
        ];
        for (input, expected) in cases {
            let joined: String = parse_spans(input, StyleSet::PLAIN)
                .iter()
                .map(TextRun::content)
                .collect();
            assert_eq!(joined, expected, "input {input:?}");
        }
    }

    #[test]
    fn options_flow_through_converter() {
        let converter = Converter::new(ConvertOptions {
            chunk_limit: 4,
            ..ConvertOptions::default()
        });
        let blocks = converter.convert("abcdefghij");
        let runs = blocks[0].rich_text().unwrap();
        assert_eq!(
            runs.iter().map(TextRun::content).collect::<Vec<_>>(),
            vec!["abcd", "efgh", "ij"]
        );
    }
}
