// Figure rewriting
//
// Turns each language-tagged code chunk into a docs chunk holding a
// figure with a listing, caption and label. Uses become cross-reference
// text lines.

use crate::analysis::{ChunkId, ChunkKind, ChunkTable, LanguageMap};
use crate::config::FigureConfig;
use crate::parser::TagLine;
use std::collections::HashSet;
use tracing::debug;

/// Insert `@language <tag>` after the begin marker of every tagged chunk.
///
/// Earlier `@language` lines are dropped first, so running it twice
/// gives the same chunk.
pub fn annotate(table: &mut ChunkTable, languages: &LanguageMap) {
    for (id, chunk) in table.iter_mut() {
        let Some(lang) = languages.get(&id) else {
            continue;
        };
        if !chunk.is_code() {
            continue;
        }

        let mut lines = Vec::with_capacity(chunk.lines().len() + 1);
        for line in chunk.lines() {
            let tag = TagLine::classify(line);
            if matches!(tag, TagLine::Language(_)) {
                continue;
            }
            lines.push(line.clone());
            if tag.is_code_begin() {
                lines.push(format!("@language {}\n", lang));
            }
        }
        chunk.replace_lines(lines);
    }
}

/// Captions that already produced a `\label`
#[derive(Debug, Default)]
pub struct LabelRegistry {
    seen: HashSet<String>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `caption`; true the first time only
    pub fn claim(&mut self, caption: &str) -> bool {
        self.seen.insert(caption.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Rewrites annotated code chunks into figure markup
pub struct FigureRewriter<'a> {
    style: &'a FigureConfig,
    labels: LabelRegistry,
}

impl<'a> FigureRewriter<'a> {
    pub fn new(style: &'a FigureConfig) -> Self {
        Self {
            style,
            labels: LabelRegistry::new(),
        }
    }

    /// Labels emitted so far
    pub fn labels(&self) -> &LabelRegistry {
        &self.labels
    }

    /// Rewrite every tagged code chunk in ascending id order; returns how
    /// many were rewritten.
    ///
    /// Hidden chunks never claim a label, so the first visible segment of a
    /// name carries it.
    pub fn rewrite_table(&mut self, table: &mut ChunkTable, languages: &LanguageMap) -> usize {
        let ids: Vec<ChunkId> = table
            .code_chunks()
            .map(|(id, _)| id)
            .filter(|id| languages.contains_key(id))
            .collect();

        let mut rewritten = 0;
        for id in ids {
            let visible = !table.is_hidden(id);
            let Some(chunk) = table.get_mut(id) else {
                continue;
            };
            let lines = self.rewrite_lines(chunk.lines(), visible);
            chunk.replace_lines(lines);
            rewritten += 1;
            debug!(chunk = %id, hidden = !visible, "rewritten as figure");
        }
        rewritten
    }

    /// Rewrite one annotated code chunk's lines
    pub fn rewrite_chunk(&mut self, lines: &[String]) -> Vec<String> {
        self.rewrite_lines(lines, true)
    }

    fn rewrite_lines(&mut self, lines: &[String], claim_label: bool) -> Vec<String> {
        let mut out = Vec::with_capacity(lines.len() + 12);
        let mut caption = String::new();

        for line in lines {
            match TagLine::classify(line) {
                TagLine::Language(lang) => {
                    out.push("@nl\n".to_string());
                    out.push(format!("@text \\begin{{figure}}[{}]\n", self.style.placement));
                    out.push("@nl\n".to_string());
                    out.push(format!(
                        "@text \\begin{{{}}}[{}]{{{}}}\n",
                        self.style.environment, self.style.options, lang
                    ));
                }
                TagLine::Defn(name) => {
                    caption = name.to_string();
                }
                TagLine::Use(name) => {
                    out.push(format!(
                        "@text {} $\\cref{{{name}}}$ ({name})\n",
                        self.style.reference_prefix
                    ));
                }
                TagLine::Begin(ChunkKind::Code, _) => {
                    out.push(to_docs(line));
                }
                TagLine::End(ChunkKind::Code, _) => {
                    out.push(format!("@text \\end{{{}}}\n", self.style.environment));
                    out.push("@nl\n".to_string());
                    out.push(format!("@text \\caption{{{}}}\n", escape_caption(&caption)));
                    out.push("@nl\n".to_string());
                    if claim_label && self.labels.claim(&caption) {
                        out.push(format!("@text \\label{{{}}}\n", caption));
                        out.push("@nl\n".to_string());
                    }
                    out.push("@text \\end{figure}\n".to_string());
                    out.push("@nl\n".to_string());
                    out.push(to_docs(line));
                }
                _ => out.push(line.clone()),
            }
        }

        out
    }
}

/// Flip a `@begin code`/`@end code` marker to `docs`, keeping the rest
/// of the line as is
fn to_docs(line: &str) -> String {
    line.replacen(ChunkKind::Code.as_str(), ChunkKind::Docs.as_str(), 1)
}

/// Escape underscores for LaTeX
fn escape_caption(caption: &str) -> String {
    caption.replace('_', "\\_")
}
