// Tag-line classification
//
// noweb's pipeline format is line oriented: each line starts with a
// keyword such as `@begin`, `@defn` or `@text`. Only the structural
// keywords matter here; everything else is carried through untouched.

use crate::analysis::{ChunkId, ChunkKind, ChunkName, Language};

/// A classified line of the tagged stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagLine {
    /// `@begin code <id>` / `@begin docs <id>`
    Begin(ChunkKind, ChunkId),
    /// `@end code <id>` / `@end docs <id>`
    End(ChunkKind, ChunkId),
    /// `@defn <name...>`
    Defn(ChunkName),
    /// `@use <name...>`
    Use(ChunkName),
    /// `@language <tag>`, injected before figure rewriting
    Language(Language),
    /// `@text % HIDDEN`
    Hidden,
    /// A begin or end marker whose id is missing or not an integer
    BadMarker(String),
    /// Anything else
    Other,
}

impl TagLine {
    /// Classify a raw line (terminator included or not)
    pub fn classify(line: &str) -> Self {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.as_slice() {
            ["@begin", kind, rest @ ..] => match ChunkKind::from_token(kind) {
                Some(kind) => match parse_id(rest) {
                    Ok(id) => TagLine::Begin(kind, id),
                    Err(msg) => TagLine::BadMarker(msg),
                },
                None => TagLine::Other,
            },
            ["@end", kind, rest @ ..] => match ChunkKind::from_token(kind) {
                Some(kind) => match parse_id(rest) {
                    Ok(id) => TagLine::End(kind, id),
                    Err(msg) => TagLine::BadMarker(msg),
                },
                None => TagLine::Other,
            },
            ["@defn", name @ ..] => TagLine::Defn(ChunkName::from_tokens(name)),
            ["@use", name @ ..] => TagLine::Use(ChunkName::from_tokens(name)),
            ["@language", tag, ..] => TagLine::Language(Language::from_tag(tag)),
            ["@text", "%", "HIDDEN"] => TagLine::Hidden,
            _ => TagLine::Other,
        }
    }

    /// Is this an opening marker for a code chunk?
    pub fn is_code_begin(&self) -> bool {
        matches!(self, TagLine::Begin(ChunkKind::Code, _))
    }
}

fn parse_id(rest: &[&str]) -> Result<ChunkId, String> {
    let token = rest
        .first()
        .ok_or_else(|| "chunk marker without an id".to_string())?;
    token
        .parse::<u32>()
        .map(ChunkId)
        .map_err(|_| format!("invalid chunk id '{}'", token))
}

/// Does a raw line declare the given output file?
pub fn is_file_directive(line: &str, target: &str) -> bool {
    line.trim()
        .strip_prefix("@file ")
        .is_some_and(|name| name == target)
}
