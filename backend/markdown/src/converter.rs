//! Converter entry point and its read-only options.

use crate::ir::{Block, StyleSet, TextRun};

/// Default per-run content limit imposed by the Notion API.
pub const DEFAULT_CHUNK_LIMIT: usize = 2000;

/// Default ceiling on nested emphasis and nested blockquotes.
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Tunables supplied by the caller, usually from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Maximum characters per rich-text run.
    pub chunk_limit: usize,
    /// Nesting level past which delimiters are kept as literal text.
    pub max_depth: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            chunk_limit: DEFAULT_CHUNK_LIMIT,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Markdown to Notion block converter.
///
/// Holds no mutable state, so one instance can be shared freely across
/// threads and requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Converter {
    pub(crate) options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ConvertOptions {
        self.options
    }

    /// Segments `markdown` into top-level blocks. Never fails.
    pub fn convert(&self, markdown: &str) -> Vec<Block> {
        self.segment(markdown)
    }

    /// Parses one line of inline markdown with no inherited style.
    pub fn rich_text(&self, text: &str) -> Vec<TextRun> {
        self.parse_spans(text, StyleSet::PLAIN)
    }
}
