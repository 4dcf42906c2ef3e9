// Language resolution
//
// Chunks whose name carries a known file extension are tagged directly.
// Tags then flow along `@use` edges to every chunk sharing the used name,
// until nothing changes.

use crate::analysis::{ChunkId, ChunkTable, ExtensionTable, Language};
use crate::error::{Error, Result};
use petgraph::graphmap::DiGraphMap;
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, warn};

/// Resolved language per code chunk
pub type LanguageMap = BTreeMap<ChunkId, Language>;

/// Propagates language tags through the use graph
pub struct LanguageResolver<'a> {
    extensions: &'a ExtensionTable,
}

impl<'a> LanguageResolver<'a> {
    pub fn new(extensions: &'a ExtensionTable) -> Self {
        Self { extensions }
    }

    /// Build the use graph: an edge from every code chunk to each chunk
    /// defining a name it uses
    pub fn use_graph(table: &ChunkTable) -> DiGraphMap<ChunkId, ()> {
        let index = table.name_index();
        let mut graph = DiGraphMap::new();

        for (id, chunk) in table.code_chunks() {
            graph.add_node(id);
            for used in chunk.uses() {
                for &target in index.ids(&used) {
                    graph.add_edge(id, target, ());
                }
            }
        }

        graph
    }

    /// Tag every code chunk reachable from an extension-bearing chunk.
    ///
    /// Fails if a chunk would receive two different tags.
    pub fn resolve(&self, table: &ChunkTable) -> Result<LanguageMap> {
        let graph = Self::use_graph(table);
        let mut languages = LanguageMap::new();
        let mut queue = VecDeque::new();

        // Every root is tagged before anything propagates, so a root
        // reached with a different tag is reported as a conflict.
        for (id, chunk) in table.code_chunks() {
            match chunk.require_name(id) {
                Ok(name) => {
                    if let Some(lang) = self.extensions.infer(&name) {
                        debug!(chunk = %id, name = %name, language = %lang, "tagged from extension");
                        languages.insert(id, lang);
                        queue.push_back(id);
                    }
                }
                Err(e) => warn!(lines = ?chunk.lines(), "{}", e),
            }
        }

        while let Some(id) = queue.pop_front() {
            let lang = match languages.get(&id) {
                Some(lang) => lang.clone(),
                None => continue,
            };

            for target in graph.neighbors(id) {
                match languages.get(&target) {
                    Some(existing) if *existing != lang => {
                        let name = table
                            .get(target)
                            .and_then(|c| c.name())
                            .unwrap_or_default();
                        return Err(Error::LanguageConflict {
                            name,
                            chunk: target,
                            existing: existing.clone(),
                            incoming: lang,
                        });
                    }
                    Some(_) => {}
                    None => {
                        languages.insert(target, lang.clone());
                        queue.push_back(target);
                    }
                }
            }
        }

        for (id, chunk) in table.code_chunks() {
            if !languages.contains_key(&id) {
                debug!(
                    chunk = %id,
                    name = %chunk.name().unwrap_or_default(),
                    "no language reaches chunk; left as plain code"
                );
            }
        }

        Ok(languages)
    }
}
