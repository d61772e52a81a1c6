//! Documents (tweets) and their split into yearly periods.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Timestamp layout of the `created_at` field in tweet payloads.
pub const TWITTER_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// A document reduced to what period splitting needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(alias = "tweet_id")]
    pub id: String,
    #[serde(alias = "tweet_date")]
    pub date: DateTime<Utc>,
}

impl Document {
    pub fn new(id: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self { id: id.into(), date }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// Parse a `created_at` string such as `Wed Oct 10 20:19:24 +0000 2018`.
pub fn parse_twitter_date(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_str(raw.trim(), TWITTER_DATE_FORMAT)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Parse(format!("invalid tweet date '{raw}': {e}")))
}

/// Group document ids by calendar year (UTC).
pub fn split_by_year<'a, I>(documents: I) -> BTreeMap<i32, HashSet<String>>
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut periods: BTreeMap<i32, HashSet<String>> = BTreeMap::new();
    for doc in documents {
        periods.entry(doc.year()).or_default().insert(doc.id.clone());
    }
    periods
}
