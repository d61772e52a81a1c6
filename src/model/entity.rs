//! Entity rows: the tagged tokens produced upstream by the tagger.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// One tagged entity occurrence inside a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRow {
    #[serde(alias = "tweet_id")]
    pub document_id: String,
    pub entity_index: u32,
    pub entity_text: String,
    pub entity_tag: String,
    #[serde(default, alias = "entity_conf")]
    pub entity_confidence: Option<f64>,
}

impl EntityRow {
    pub fn new(
        document_id: impl Into<String>,
        entity_index: u32,
        entity_text: impl Into<String>,
        entity_tag: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            entity_index,
            entity_text: entity_text.into(),
            entity_tag: entity_tag.into(),
            entity_confidence: None,
        }
    }
}

/// Immutable table of entity rows, grouped per document.
///
/// Documents are kept in id order and their rows in `entity_index` order,
/// so everything derived from the table is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityTable {
    documents: BTreeMap<String, Vec<EntityRow>>,
    len: usize,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Rows grouped by document, each group ordered by `entity_index`.
    pub fn documents(&self) -> impl Iterator<Item = (&str, &[EntityRow])> {
        self.documents.iter().map(|(id, rows)| (id.as_str(), rows.as_slice()))
    }

    pub fn rows(&self) -> impl Iterator<Item = &EntityRow> {
        self.documents.values().flatten()
    }

    /// Keep only rows whose document is in `ids` (e.g. one year of tweets).
    pub fn restrict_to(&self, ids: &HashSet<String>) -> Self {
        self.filter(|row| ids.contains(&row.document_id))
    }

    /// Keep only rows matching `keep`.
    pub fn filter(&self, mut keep: impl FnMut(&EntityRow) -> bool) -> Self {
        self.rows().filter(|row| keep(row)).cloned().collect()
    }
}

impl FromIterator<EntityRow> for EntityTable {
    fn from_iter<I: IntoIterator<Item = EntityRow>>(iter: I) -> Self {
        let mut documents: BTreeMap<String, Vec<EntityRow>> = BTreeMap::new();
        let mut len = 0;
        for row in iter {
            documents.entry(row.document_id.clone()).or_default().push(row);
            len += 1;
        }
        for rows in documents.values_mut() {
            rows.sort_by_key(|row| row.entity_index);
        }
        Self { documents, len }
    }
}
