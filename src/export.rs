//! Flat-file interchange: tables in, graphs and metrics out.
//!
//! ```text
//! entities.csv / entities.json ─┐
//! tweets.json ──────────────────┼→ build → CoGraph ─→ edges_{topic}.csv
//! communities.csv ──────────────┘                  ─→ graph.json (node-link)
//!                                                  ─→ {metric}_{topic}.json
//! AffinityTable ─→ affinity_{topic}_{period}.csv
//! ```
//!
//! Every reader takes `&mut dyn Read` and every writer `&mut dyn Write`,
//! so callers choose files, buffers or pipes.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::affinity::{AffinityTable, CommunityAssignment};
use crate::build::VocabularyEntry;
use crate::model::*;
use crate::report::{GraphReport, MetricOutcome};
use crate::{Error, Result};

/// Cell written for a metric that failed.
pub const MISSING_CELL: &str = "NA";

// ============================================================================
// Input tables
// ============================================================================

pub fn read_entities_csv(reader: &mut dyn Read) -> Result<EntityTable> {
    let mut rdr = csv::Reader::from_reader(reader);
    let rows = rdr.deserialize::<EntityRow>().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows.into_iter().collect())
}

/// Entity table stored as a JSON array of records.
pub fn read_entities_json(reader: &mut dyn Read) -> Result<EntityTable> {
    let rows: Vec<EntityRow> = serde_json::from_reader(reader)?;
    Ok(rows.into_iter().collect())
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(alias = "tweet_id", alias = "id_str")]
    id: serde_json::Value,
    #[serde(alias = "tweet_date", alias = "created_at")]
    date: serde_json::Value,
}

fn json_id(value: &serde_json::Value) -> Result<String> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(Error::Parse(format!("unsupported document id {other}"))),
    }
}

/// Epoch milliseconds, tweet `created_at` text, or RFC 3339.
fn json_date(value: &serde_json::Value) -> Result<DateTime<Utc>> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .ok_or_else(|| Error::Parse(format!("timestamp out of range: {n}"))),
        serde_json::Value::String(s) => parse_twitter_date(s).or_else(|_| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| Error::Parse(format!("invalid document date '{s}': {e}")))
        }),
        other => Err(Error::Parse(format!("unsupported document date {other}"))),
    }
}

/// Tweets table as a JSON array of `{tweet_id, tweet_date, ...}` records.
pub fn read_documents_json(reader: &mut dyn Read) -> Result<Vec<Document>> {
    let raw: Vec<RawDocument> = serde_json::from_reader(reader)?;
    raw.iter()
        .map(|r| Ok(Document::new(json_id(&r.id)?, json_date(&r.date)?)))
        .collect()
}

/// Community CSV with `hashtag,community[,year]` columns.
pub fn read_communities_csv(reader: &mut dyn Read) -> Result<Vec<CommunityAssignment>> {
    let mut rdr = csv::Reader::from_reader(reader);
    Ok(rdr
        .deserialize::<CommunityAssignment>()
        .collect::<std::result::Result<Vec<_>, _>>()?)
}

// ============================================================================
// Edge list CSV
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct EdgeRecord {
    x_text: String,
    x_tag: String,
    y_text: String,
    y_tag: String,
    weight: u64,
    period: i32,
}

/// Write every edge of every period graph, one row per edge.
pub fn write_edge_list_csv(writer: &mut dyn Write, graphs: &BTreeMap<i32, CoGraph>) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (period, graph) in graphs {
        for edge in graph.edges() {
            let (x, y) = (graph.key(edge.source), graph.key(edge.target));
            wtr.serialize(EdgeRecord {
                x_text: x.text().to_string(),
                x_tag: x.tag().unwrap_or_default().to_string(),
                y_text: y.text().to_string(),
                y_tag: y.tag().unwrap_or_default().to_string(),
                weight: edge.weight,
                period: *period,
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Rebuild per-period graphs from an edge list. Isolated nodes are not
/// part of an edge list and therefore do not come back.
pub fn read_edge_list_csv(reader: &mut dyn Read) -> Result<BTreeMap<i32, CoGraph>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut builders: BTreeMap<i32, GraphBuilder> = BTreeMap::new();
    for record in rdr.deserialize::<EdgeRecord>() {
        let record = record?;
        let builder = builders.entry(record.period).or_default();
        let x = builder.add_node(NodeKey::from_parts(record.x_text, Some(&record.x_tag)));
        let y = builder.add_node(NodeKey::from_parts(record.y_text, Some(&record.y_tag)));
        builder.add_weight(x, y, record.weight);
    }
    Ok(builders.into_iter().map(|(p, b)| (p, b.build())).collect())
}

// ============================================================================
// Node-link JSON
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct NodeLinkNode {
    id: String,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeLinkEdge {
    source: String,
    target: String,
    weight: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeLinkGraph {
    nodes: Vec<NodeLinkNode>,
    links: Vec<NodeLinkEdge>,
}

pub fn write_node_link_json(writer: &mut dyn Write, graph: &CoGraph) -> Result<()> {
    let doc = NodeLinkGraph {
        nodes: graph
            .nodes()
            .map(|(_, key)| NodeLinkNode {
                id: key.to_string(),
                text: key.text().to_string(),
                tag: key.tag().map(str::to_string),
            })
            .collect(),
        links: graph
            .edges()
            .map(|e| NodeLinkEdge {
                source: graph.key(e.source).to_string(),
                target: graph.key(e.target).to_string(),
                weight: e.weight,
            })
            .collect(),
    };
    serde_json::to_writer_pretty(writer, &doc)?;
    Ok(())
}

pub fn read_node_link_json(reader: &mut dyn Read) -> Result<CoGraph> {
    let doc: NodeLinkGraph = serde_json::from_reader(reader)?;
    let mut builder = GraphBuilder::new();
    let mut ids: HashMap<String, NodeId> = HashMap::new();
    for node in doc.nodes {
        let key = NodeKey::from_parts(node.text, node.tag.as_deref());
        let id = builder.add_node(key);
        if ids.insert(node.id.clone(), id).is_some() {
            return Err(Error::Parse(format!("duplicate node id '{}'", node.id)));
        }
    }
    for link in doc.links {
        let lookup = |name: &str| {
            ids.get(name).copied().ok_or_else(|| Error::NotFound(format!("link endpoint '{name}'")))
        };
        builder.add_weight(lookup(&link.source)?, lookup(&link.target)?, link.weight);
    }
    Ok(builder.build())
}

// ============================================================================
// Metrics
// ============================================================================

/// One JSON document keyed by period.
pub fn write_metric_json<K, T>(writer: &mut dyn Write, by_period: &BTreeMap<K, T>) -> Result<()>
where
    K: Serialize,
    T: Serialize,
{
    serde_json::to_writer_pretty(writer, by_period)?;
    Ok(())
}

fn write_metric_file<T: Serialize>(
    dir: &Path,
    metric: &str,
    topic: &str,
    by_period: &BTreeMap<String, T>,
) -> Result<PathBuf> {
    let path = dir.join(format!("{metric}_{topic}.json"));
    let mut out = BufWriter::new(File::create(&path)?);
    write_metric_json(&mut out, by_period)?;
    out.flush()?;
    Ok(path)
}

/// Split reports into one file per metric: `{metric}_{topic}.json`.
pub fn write_reports<K>(
    dir: impl AsRef<Path>,
    topic: &str,
    reports: &BTreeMap<K, GraphReport>,
) -> Result<Vec<PathBuf>>
where
    K: ToString,
{
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    fn pick<K: ToString, T: Clone>(
        reports: &BTreeMap<K, GraphReport>,
        f: impl Fn(&GraphReport) -> &T,
    ) -> BTreeMap<String, T> {
        reports.iter().map(|(k, r)| (k.to_string(), f(r).clone())).collect()
    }

    let paths = vec![
        write_metric_file(dir, "connected_components", topic, &pick(reports, |r| &r.components))?,
        write_metric_file(dir, "degree", topic, &pick(reports, |r| &r.degree))?,
        write_metric_file(dir, "betweenness", topic, &pick(reports, |r| &r.betweenness))?,
        write_metric_file(dir, "pagerank", topic, &pick(reports, |r| &r.pagerank))?,
        write_metric_file(dir, "degree_distribution", topic, &pick(reports, |r| &r.degree_distribution))?,
        write_metric_file(dir, "power_law", topic, &pick(reports, |r| &r.power_law))?,
    ];
    info!(files = paths.len(), topic, "metrics written");
    Ok(paths)
}

pub fn write_vocabulary_csv(writer: &mut dyn Write, vocabulary: &[VocabularyEntry]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["index", "text", "tag", "count"])?;
    for entry in vocabulary {
        wtr.write_record([
            entry.index.to_string(),
            entry.key.text().to_string(),
            entry.key.tag().unwrap_or_default().to_string(),
            entry.count.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

// ============================================================================
// Affinity CSV
// ============================================================================

/// Columns `node,kind,<cluster...>`; failed clusters write `NA`.
pub fn write_affinity_csv(writer: &mut dyn Write, table: &AffinityTable) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["node".to_string(), "kind".to_string()];
    header.extend(table.labels().map(str::to_string));
    wtr.write_record(&header)?;

    for (row, node) in table.nodes.iter().enumerate() {
        let mut record = vec![node.id().to_string(), node.kind().to_string()];
        for column in &table.columns {
            record.push(match &column.scores {
                MetricOutcome::Computed(scores) => scores
                    .get(row)
                    .map_or_else(|| MISSING_CELL.to_string(), |s| s.to_string()),
                MetricOutcome::Failed { .. } => MISSING_CELL.to_string(),
            });
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// One `affinity_{topic}_{period}.csv` per scored period. Periods whose
/// scoring failed as a whole are logged and skipped.
pub fn write_affinity_periods<K>(
    dir: impl AsRef<Path>,
    topic: &str,
    tables: &BTreeMap<K, Result<AffinityTable>>,
) -> Result<Vec<PathBuf>>
where
    K: std::fmt::Display,
{
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut paths = Vec::new();
    for (period, table) in tables {
        let table = match table {
            Ok(table) => table,
            Err(e) => {
                warn!(%period, topic, error = %e, "no affinity table for period");
                continue;
            }
        };
        let path = dir.join(format!("affinity_{topic}_{period}.csv"));
        let mut out = BufWriter::new(File::create(&path)?);
        write_affinity_csv(&mut out, table)?;
        out.flush()?;
        paths.push(path);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_date_variants() {
        let from_ms = json_date(&serde_json::json!(1_539_202_764_000_i64)).unwrap();
        let from_twitter = json_date(&serde_json::json!("Wed Oct 10 20:19:24 +0000 2018")).unwrap();
        let from_rfc = json_date(&serde_json::json!("2018-10-10T20:19:24Z")).unwrap();
        assert_eq!(from_ms, from_twitter);
        assert_eq!(from_twitter, from_rfc);
        assert!(json_date(&serde_json::json!(true)).is_err());
    }

    #[test]
    fn test_json_id_accepts_numbers() {
        assert_eq!(json_id(&serde_json::json!(1051)).unwrap(), "1051");
        assert_eq!(json_id(&serde_json::json!("1051")).unwrap(), "1051");
    }

    #[test]
    fn test_node_link_keeps_keys_with_slashes_apart() {
        let graph = CoGraph::from_weighted_edges(vec![
            (NodeKey::word("a/b", "N"), NodeKey::word("a", "b/N"), 2),
            (NodeKey::word("a", "b/N"), NodeKey::hashtag("a/b/N"), 1),
        ]);
        let mut buf = Vec::new();
        write_node_link_json(&mut buf, &graph).unwrap();
        let back = read_node_link_json(&mut buf.as_slice()).unwrap();

        assert_eq!(back.node_count(), 3);
        assert_eq!(
            back.weight_between(&NodeKey::word("a/b", "N"), &NodeKey::word("a", "b/N")),
            Some(2)
        );
        assert_eq!(crate::centrality::degree(&graph).by_label(&graph).len(), 3);
    }

    #[test]
    fn test_vocabulary_csv() {
        let vocab = vec![VocabularyEntry { index: 0, key: NodeKey::word("climate", "N"), count: 4 }];
        let mut buf = Vec::new();
        write_vocabulary_csv(&mut buf, &vocab).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "index,text,tag,count\n0,climate,N,4\n");
    }
}
