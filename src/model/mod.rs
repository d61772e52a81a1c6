//! # Discourse Graph Model
//!
//! Plain DTOs shared by every stage: entity rows in, co-occurrence graph
//! out. These types cross every boundary: loading ↔ building ↔ metrics ↔
//! export.
//!
//! Design rule: this module does no file I/O and holds no global state.

pub mod node;
pub mod edge;
pub mod entity;
pub mod document;
pub mod graph;

pub use node::{NodeId, NodeKey, NodeIdentity};
pub use edge::Edge;
pub use entity::{EntityRow, EntityTable};
pub use document::{Document, parse_twitter_date, split_by_year, TWITTER_DATE_FORMAT};
pub use graph::{CoGraph, GraphBuilder};
