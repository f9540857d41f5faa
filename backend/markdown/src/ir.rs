//! Notion Block Intermediate Representation
//!
//! Strongly-typed blocks and rich-text runs produced by the converter. The
//! `Serialize` impls emit the Notion block schema directly, so a `Vec<Block>`
//! can be posted as `children` without a translation layer.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::debug;

/// Notion rejects more than this many children in a single block or request.
pub const MAX_CHILDREN: usize = 100;

/// Icon used for callouts produced from blockquotes.
pub const CALLOUT_ICON: &str = "💡";

/// Inline annotation flags. Adding a flag yields a new value; runs never share one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct StyleSet {
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub code: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl StyleSet {
    pub const PLAIN: StyleSet = StyleSet {
        bold: false,
        italic: false,
        strikethrough: false,
        code: false,
    };

    pub fn with_bold(self) -> Self {
        Self { bold: true, ..self }
    }

    pub fn with_italic(self) -> Self {
        Self { italic: true, ..self }
    }

    pub fn with_strikethrough(self) -> Self {
        Self {
            strikethrough: true,
            ..self
        }
    }

    pub fn with_code(self) -> Self {
        Self { code: true, ..self }
    }

    /// True when no annotation is set.
    pub fn is_plain(&self) -> bool {
        *self == Self::PLAIN
    }
}

/// One element of a Notion `rich_text` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextRun {
    Text {
        content: String,
        style: StyleSet,
        link: Option<String>,
    },
    Equation {
        expression: String,
    },
}

impl TextRun {
    pub fn plain(content: impl Into<String>) -> Self {
        Self::styled(content, StyleSet::PLAIN)
    }

    pub fn styled(content: impl Into<String>, style: StyleSet) -> Self {
        TextRun::Text {
            content: content.into(),
            style,
            link: None,
        }
    }

    pub fn link(content: impl Into<String>, style: StyleSet, url: impl Into<String>) -> Self {
        TextRun::Text {
            content: content.into(),
            style,
            link: Some(url.into()),
        }
    }

    pub fn equation(expression: impl Into<String>) -> Self {
        TextRun::Equation {
            expression: expression.into(),
        }
    }

    /// Text content or equation source, ignoring styling.
    pub fn content(&self) -> &str {
        match self {
            TextRun::Text { content, .. } => content,
            TextRun::Equation { expression } => expression,
        }
    }

    /// Annotation flags; equations are always plain.
    pub fn style(&self) -> StyleSet {
        match self {
            TextRun::Text { style, .. } => *style,
            TextRun::Equation { .. } => StyleSet::PLAIN,
        }
    }
}

#[derive(Serialize)]
struct LinkRef<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct TextBody<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<LinkRef<'a>>,
}

#[derive(Serialize)]
struct EquationBody<'a> {
    expression: &'a str,
}

impl Serialize for TextRun {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TextRun::Text {
                content,
                style,
                link,
            } => {
                let len = if style.is_plain() { 2 } else { 3 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("type", "text")?;
                map.serialize_entry(
                    "text",
                    &TextBody {
                        content,
                        link: link.as_deref().map(|url| LinkRef { url }),
                    },
                )?;
                if !style.is_plain() {
                    map.serialize_entry("annotations", style)?;
                }
                map.end()
            }
            TextRun::Equation { expression } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "equation")?;
                map.serialize_entry("equation", &EquationBody { expression })?;
                map.end()
            }
        }
    }
}

/// A Notion block. Text-bearing kinds own their `rich_text`; callouts own children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph {
        rich_text: Vec<TextRun>,
    },
    Heading1 {
        rich_text: Vec<TextRun>,
    },
    Heading2 {
        rich_text: Vec<TextRun>,
    },
    Heading3 {
        rich_text: Vec<TextRun>,
    },
    BulletedListItem {
        rich_text: Vec<TextRun>,
    },
    NumberedListItem {
        rich_text: Vec<TextRun>,
    },
    ToDo {
        rich_text: Vec<TextRun>,
        checked: bool,
    },
    Code {
        rich_text: Vec<TextRun>,
        language: String,
    },
    Equation {
        expression: String,
    },
    Callout {
        icon: String,
        children: Vec<Block>,
    },
    Divider,
}

impl Block {
    /// Builds a callout, dropping children past [`MAX_CHILDREN`].
    pub fn callout(mut children: Vec<Block>) -> Self {
        if children.len() > MAX_CHILDREN {
            debug!(
                dropped = children.len() - MAX_CHILDREN,
                "Truncating callout children"
            );
            children.truncate(MAX_CHILDREN);
        }
        Block::Callout {
            icon: CALLOUT_ICON.to_string(),
            children,
        }
    }

    /// Builds a heading, clamping `level` into the supported 1..=3 range.
    pub fn heading(level: u8, rich_text: Vec<TextRun>) -> Self {
        match level {
            0 | 1 => Block::Heading1 { rich_text },
            2 => Block::Heading2 { rich_text },
            _ => Block::Heading3 { rich_text },
        }
    }

    /// The Notion `type` discriminator, which doubles as the payload key.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Paragraph { .. } => "paragraph",
            Block::Heading1 { .. } => "heading_1",
            Block::Heading2 { .. } => "heading_2",
            Block::Heading3 { .. } => "heading_3",
            Block::BulletedListItem { .. } => "bulleted_list_item",
            Block::NumberedListItem { .. } => "numbered_list_item",
            Block::ToDo { .. } => "to_do",
            Block::Code { .. } => "code",
            Block::Equation { .. } => "equation",
            Block::Callout { .. } => "callout",
            Block::Divider => "divider",
        }
    }

    pub fn rich_text(&self) -> Option<&[TextRun]> {
        match self {
            Block::Paragraph { rich_text }
            | Block::Heading1 { rich_text }
            | Block::Heading2 { rich_text }
            | Block::Heading3 { rich_text }
            | Block::BulletedListItem { rich_text }
            | Block::NumberedListItem { rich_text }
            | Block::ToDo { rich_text, .. }
            | Block::Code { rich_text, .. } => Some(rich_text),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Block] {
        match self {
            Block::Callout { children, .. } => children,
            _ => &[],
        }
    }
}

#[derive(Serialize)]
struct RichTextBody<'a> {
    rich_text: &'a [TextRun],
    #[serde(skip_serializing_if = "Option::is_none")]
    checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
}

impl<'a> RichTextBody<'a> {
    fn new(rich_text: &'a [TextRun]) -> Self {
        Self {
            rich_text,
            checked: None,
            language: None,
        }
    }
}

#[derive(Serialize)]
struct EmojiIcon<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    emoji: &'a str,
}

#[derive(Serialize)]
struct CalloutBody<'a> {
    rich_text: [TextRun; 0],
    icon: EmojiIcon<'a>,
    children: &'a [Block],
}

#[derive(Serialize)]
struct EmptyBody {}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.kind();
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("object", "block")?;
        map.serialize_entry("type", kind)?;
        match self {
            Block::ToDo { rich_text, checked } => map.serialize_entry(
                kind,
                &RichTextBody {
                    checked: Some(*checked),
                    ..RichTextBody::new(rich_text)
                },
            )?,
            Block::Code {
                rich_text,
                language,
            } => map.serialize_entry(
                kind,
                &RichTextBody {
                    language: Some(language),
                    ..RichTextBody::new(rich_text)
                },
            )?,
            Block::Equation { expression } => {
                map.serialize_entry(kind, &EquationBody { expression })?
            }
            Block::Callout { icon, children } => map.serialize_entry(
                kind,
                &CalloutBody {
                    rich_text: [],
                    icon: EmojiIcon {
                        kind: "emoji",
                        emoji: icon,
                    },
                    children,
                },
            )?,
            Block::Divider => map.serialize_entry(kind, &EmptyBody {})?,
            other => {
                // Remaining kinds carry rich text only.
                let rich_text = other.rich_text().unwrap_or(&[]);
                map.serialize_entry(kind, &RichTextBody::new(rich_text))?
            }
        }
        map.end()
    }
}
