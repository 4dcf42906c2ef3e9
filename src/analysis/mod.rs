// Analysis module: chunk model, language inference and the filter pipeline

pub mod chunks;
pub mod language;
pub mod resolver;

pub use chunks::*;
pub use language::*;
pub use resolver::*;

use crate::config::Config;
use crate::error::Result;
use crate::output::{annotate, emit, FigureRewriter};
use crate::parser::StreamParser;
use std::io::{BufRead, Write};
use tracing::info;

/// What a pipeline run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Chunk counts after parsing
    pub stats: ChunkStats,
    /// Code chunks that received a language
    pub tagged: usize,
    /// Chunks rewritten as figures
    pub rewritten: usize,
    /// Distinct labels emitted
    pub labels: usize,
    /// Chunks written to the output
    pub emitted: usize,
}

impl Report {
    pub fn summary(&self) -> String {
        format!(
            "{} code chunks ({} tagged, {} figures, {} labels), {} docs chunks, {} hidden, {} written",
            self.stats.code,
            self.tagged,
            self.rewritten,
            self.labels,
            self.stats.docs,
            self.stats.hidden,
            self.emitted
        )
    }
}

/// Runs parse, resolve, annotate, rewrite and emit in order
pub struct Pipeline {
    config: Config,
    extensions: ExtensionTable,
}

impl Pipeline {
    /// Create a pipeline with the given configuration
    pub fn new(config: Config) -> Self {
        let extensions = config.extension_table();
        Self { config, extensions }
    }

    /// Filter `input` into `out`.
    ///
    /// The `@file` line naming `target` is echoed while parsing. Chunks are
    /// written only once every stage has succeeded.
    pub fn process<R: BufRead, W: Write>(
        &self,
        input: R,
        target: &str,
        out: &mut W,
    ) -> Result<Report> {
        let mut table = StreamParser::new(target).parse(input, out)?;
        let stats = table.stats();
        info!(code = stats.code, docs = stats.docs, hidden = stats.hidden, "parsed stream");

        let languages = LanguageResolver::new(&self.extensions).resolve(&table)?;
        info!(tagged = languages.len(), "languages resolved");

        annotate(&mut table, &languages);
        let mut rewriter = FigureRewriter::new(&self.config.figure);
        let rewritten = rewriter.rewrite_table(&mut table, &languages);

        let emitted = emit(&table, out)?;

        Ok(Report {
            stats,
            tagged: languages.len(),
            rewritten,
            labels: rewriter.labels().len(),
            emitted,
        })
    }
}
