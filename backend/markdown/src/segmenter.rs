//! Block Segmenter
//!
//! Line-oriented pass that classifies each line (or run of lines) into a
//! Notion block. Rules are tried in a fixed order and the first hit consumes
//! the line; fenced code, display equations and blockquotes span several
//! lines. Blockquote contents are segmented recursively into callouts.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::chunk::chunk;
use crate::code_block::resolve_language;
use crate::converter::Converter;
use crate::ir::{Block, TextRun};

/// Button captions the browser integration appends after a response.
static TRAILING_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n*Send to (?:Notion|Obsidian)\s*\z").unwrap());
static CHECKBOX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-*]\s*\[([ xX])\]\s*(.+)$").unwrap());
static NUMBERED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\.\s+(.+)$").unwrap());
static RULE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*_]{3,}$").unwrap());

const FENCE: &str = "```";
const DISPLAY_MATH: &str = "$$";

/// Heading prefixes, longest first. Notion stops at level three.
const HEADING_PREFIXES: [(&str, u8); 4] = [("#### ", 3), ("### ", 3), ("## ", 2), ("# ", 1)];

/// Multi-line accumulation state.
enum Mode {
    Normal,
    Code { language: String },
    Equation,
}

/// Removes trailing UI captions, repeatedly, so stacked buttons all go.
pub fn strip_trailing_markers(text: &str) -> &str {
    let mut text = text;
    while let Some(found) = TRAILING_MARKER.find(text) {
        text = &text[..found.start()];
    }
    text
}

fn heading(line: &str) -> Option<(u8, &str)> {
    HEADING_PREFIXES
        .iter()
        .find_map(|(prefix, level)| line.strip_prefix(prefix).map(|rest| (*level, rest)))
}

fn bullet(line: &str) -> Option<&str> {
    line.strip_prefix("- ").or_else(|| line.strip_prefix("* "))
}

fn quote_line(stripped: &str) -> Option<&str> {
    if stripped == ">" {
        Some("")
    } else {
        stripped.strip_prefix("> ")
    }
}

impl Converter {
    /// Segments `text` into blocks. Total: malformed markdown degrades to paragraphs.
    pub fn segment(&self, text: &str) -> Vec<Block> {
        self.segment_at_depth(text, 0)
    }

    fn segment_at_depth(&self, text: &str, depth: usize) -> Vec<Block> {
        let text = strip_trailing_markers(text);
        let lines: Vec<&str> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();

        let mut blocks = Vec::new();
        let mut mode = Mode::Normal;
        let mut buffer: Vec<&str> = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];
            let stripped = line.trim();

            // 1. Display equations. Fenced code is opaque, so `$$` there is content.
            if stripped.starts_with(DISPLAY_MATH) && !matches!(mode, Mode::Code { .. }) {
                if matches!(mode, Mode::Equation) {
                    if stripped.ends_with(DISPLAY_MATH) && stripped.len() > 2 {
                        buffer.push(&stripped[..stripped.len() - 2]);
                    }
                    self.push_equations(&mut blocks, &buffer.join("\n"));
                    buffer.clear();
                    mode = Mode::Normal;
                } else if stripped.ends_with(DISPLAY_MATH) && stripped.len() > 4 {
                    self.push_equations(&mut blocks, stripped[2..stripped.len() - 2].trim());
                } else {
                    buffer.clear();
                    if stripped.len() > 2 {
                        buffer.push(&stripped[2..]);
                    }
                    mode = Mode::Equation;
                }
                i += 1;
                continue;
            }

            if matches!(mode, Mode::Equation) {
                if stripped.ends_with(DISPLAY_MATH) {
                    buffer.push(&stripped[..stripped.len() - 2]);
                    self.push_equations(&mut blocks, &buffer.join("\n"));
                    buffer.clear();
                    mode = Mode::Normal;
                } else {
                    buffer.push(line);
                }
                i += 1;
                continue;
            }

            // 2. Fenced code toggles; any fence line closes an open block.
            if stripped.starts_with(FENCE) {
                mode = match mode {
                    Mode::Code { language } => {
                        blocks.push(self.code_block(&buffer.join("\n"), language));
                        Mode::Normal
                    }
                    _ => {
                        buffer.clear();
                        Mode::Code {
                            language: resolve_language(&stripped[FENCE.len()..]),
                        }
                    }
                };
                i += 1;
                continue;
            }

            if matches!(mode, Mode::Code { .. }) {
                buffer.push(line);
                i += 1;
                continue;
            }

            // 3. Blockquotes become callouts wrapping their segmented contents.
            if depth < self.options.max_depth && quote_line(stripped).is_some() {
                let mut quoted = Vec::new();
                while let Some(inner) = lines.get(i).and_then(|l| quote_line(l.trim())) {
                    quoted.push(inner);
                    i += 1;
                }
                quoted.retain(|l| !l.trim().is_empty());
                if !quoted.is_empty() {
                    let children = self.segment_at_depth(&quoted.join("\n"), depth + 1);
                    if !children.is_empty() {
                        blocks.push(Block::callout(children));
                    }
                }
                continue;
            }

            blocks.extend(self.line_block(line, stripped));
            i += 1;
        }

        // End of input inside a fence or display equation flushes what was buffered.
        match mode {
            Mode::Code { language } => blocks.push(self.code_block(&buffer.join("\n"), language)),
            Mode::Equation => self.push_equations(&mut blocks, &buffer.join("\n")),
            Mode::Normal => {}
        }

        blocks
    }

    /// Single-line rules 4 through 9.
    fn line_block(&self, line: &str, stripped: &str) -> Option<Block> {
        if let Some((level, rest)) = heading(line) {
            return Some(Block::heading(level, self.rich_text(rest)));
        }

        if let Some(caps) = CHECKBOX_RE.captures(stripped) {
            return Some(Block::ToDo {
                checked: caps[1].eq_ignore_ascii_case("x"),
                rich_text: self.rich_text(&caps[2]),
            });
        }

        if let Some(caps) = NUMBERED_RE.captures(stripped) {
            return Some(Block::NumberedListItem {
                rich_text: self.rich_text(&caps[2]),
            });
        }

        if let Some(rest) = bullet(line) {
            return Some(Block::BulletedListItem {
                rich_text: self.rich_text(rest),
            });
        }

        if RULE_RE.is_match(stripped) {
            return Some(Block::Divider);
        }

        if stripped.is_empty() {
            return None;
        }
        Some(Block::Paragraph {
            rich_text: self.rich_text(line),
        })
    }

    fn code_block(&self, code: &str, language: String) -> Block {
        Block::Code {
            rich_text: chunk(code, self.options.chunk_limit)
                .into_iter()
                .map(TextRun::plain)
                .collect(),
            language,
        }
    }

    fn push_equations(&self, blocks: &mut Vec<Block>, expression: &str) {
        blocks.extend(
            chunk(expression, self.options.chunk_limit)
                .into_iter()
                .map(|piece| Block::Equation {
                    expression: piece.to_string(),
                }),
        );
    }
}
