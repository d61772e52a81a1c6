//! Node identity in the co-occurrence graph.

use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

use super::EntityRow;

/// Dense node identifier, valid only within the graph that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identity of an entity once it becomes a node.
///
/// Two occurrences with equal keys are the same node regardless of the
/// document they were found in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeKey {
    /// Lexical word: text plus part-of-speech tag.
    Word { text: String, tag: String },
    /// Bare hashtag (or any text-only entity).
    Hashtag { text: String },
}

impl NodeKey {
    pub fn word(text: impl Into<String>, tag: impl Into<String>) -> Self {
        NodeKey::Word { text: text.into(), tag: tag.into() }
    }

    pub fn hashtag(text: impl Into<String>) -> Self {
        NodeKey::Hashtag { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            NodeKey::Word { text, .. } | NodeKey::Hashtag { text } => text,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            NodeKey::Word { tag, .. } => Some(tag),
            NodeKey::Hashtag { .. } => None,
        }
    }

    /// Rebuild a key from its exported columns; an empty tag means text-only.
    pub fn from_parts(text: impl Into<String>, tag: Option<&str>) -> Self {
        match tag {
            Some(tag) if !tag.is_empty() => NodeKey::word(text, tag),
            _ => NodeKey::hashtag(text),
        }
    }
}

/// Label used when keying exported tables: `text/tag` or plain `text`.
///
/// `/` and `\` inside text or tag are backslash-escaped, so a word label
/// has exactly one bare `/` and a hashtag label has none. Distinct keys
/// always get distinct labels.
impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Word { text, tag } => {
                write_escaped(f, text)?;
                f.write_char('/')?;
                write_escaped(f, tag)
            }
            NodeKey::Hashtag { text } => write_escaped(f, text),
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, raw: &str) -> fmt::Result {
    for c in raw.chars() {
        if matches!(c, '/' | '\\') {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    Ok(())
}

/// How an entity row is mapped to a node key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeIdentity {
    /// `(text, tag)`: the word-sense graph.
    #[default]
    WordSense,
    /// `text` alone: the hashtag graph.
    Hashtag,
}

impl NodeIdentity {
    pub fn key(self, row: &EntityRow) -> NodeKey {
        match self {
            NodeIdentity::WordSense => NodeKey::word(&row.entity_text, &row.entity_tag),
            NodeIdentity::Hashtag => NodeKey::hashtag(&row.entity_text),
        }
    }
}
