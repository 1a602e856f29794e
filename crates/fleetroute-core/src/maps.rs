//! Registry of imported maps and their compiled graphs.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use fleetroute_graph::Graph;
use fleetroute_types::{MapData, MapId, MapSummary};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::CoreError;

/// A stored map together with the graph built from it.
#[derive(Debug, Clone)]
struct MapEntry {
    map: Arc<MapData>,
    graph: Arc<Graph>,
}

/// Imported maps keyed by map id.
///
/// Graphs are immutable once built and handed out as [`Arc`] clones, so
/// route searches never hold the registry lock.
#[derive(Debug, Default)]
pub struct MapRegistry {
    entries: RwLock<BTreeMap<MapId, MapEntry>>,
}

impl MapRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a map document and store both.
    ///
    /// Importing a map id that already exists replaces the previous map.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Graph`] if the graph cannot be built; the
    /// registry is left unchanged.
    pub async fn import(&self, map: MapData) -> Result<MapSummary, CoreError> {
        let graph = Graph::build(&map)?;
        let summary = MapSummary {
            map_id: map.map_id.clone(),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
        };

        let entry = MapEntry {
            map: Arc::new(map),
            graph: Arc::new(graph),
        };
        let replaced = self
            .entries
            .write()
            .await
            .insert(summary.map_id.clone(), entry)
            .is_some();

        info!(
            map_id = %summary.map_id,
            nodes = summary.nodes,
            edges = summary.edges,
            replaced,
            "Map imported"
        );
        Ok(summary)
    }

    /// Read a JSON map document from disk and import it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MapFile`] if the file cannot be read,
    /// [`CoreError::MapParse`] if it is not a map document, or
    /// [`CoreError::Graph`] if the graph cannot be built.
    pub async fn import_file(&self, path: &Path) -> Result<MapSummary, CoreError> {
        let map = load_map_file(path).await?;
        self.import(map).await
    }

    /// The compiled graph for a map.
    pub async fn graph(&self, map_id: &MapId) -> Option<Arc<Graph>> {
        self.entries
            .read()
            .await
            .get(map_id)
            .map(|e| Arc::clone(&e.graph))
    }

    /// The raw map document.
    pub async fn map(&self, map_id: &MapId) -> Option<Arc<MapData>> {
        self.entries
            .read()
            .await
            .get(map_id)
            .map(|e| Arc::clone(&e.map))
    }

    /// Summaries of all imported maps, ordered by map id.
    pub async fn list(&self) -> Vec<MapSummary> {
        self.entries
            .read()
            .await
            .iter()
            .map(|(id, e)| MapSummary {
                map_id: id.clone(),
                nodes: e.graph.node_count(),
                edges: e.graph.edge_count(),
            })
            .collect()
    }

    /// Number of imported maps.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether no map has been imported.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Read and parse a JSON map document.
///
/// # Errors
///
/// Returns [`CoreError::MapFile`] or [`CoreError::MapParse`].
pub async fn load_map_file(path: &Path) -> Result<MapData, CoreError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CoreError::MapFile {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&raw).map_err(|source| CoreError::MapParse {
        path: path.to_path_buf(),
        source,
    })
}
