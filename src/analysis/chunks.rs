// Chunk model: the table of chunks rebuilt from the tagged stream

use crate::error::{Error, Result};
use crate::parser::TagLine;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Chunk identifier, taken from the `@begin` marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkId(pub u32);

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of chunk, fixed by its opening marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkKind {
    Code,
    Docs,
}

impl ChunkKind {
    /// Parse the kind token of a `@begin`/`@end` marker
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "code" => Some(ChunkKind::Code),
            "docs" => Some(ChunkKind::Docs),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkKind::Code => "code",
            ChunkKind::Docs => "docs",
        }
    }
}

/// A chunk name as a token sequence.
///
/// Names compare token-wise, so `@defn a  b` and `@use a b` refer to
/// the same chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkName(Vec<String>);

impl ChunkName {
    /// Split a name on whitespace
    pub fn parse(text: &str) -> Self {
        Self(text.split_whitespace().map(str::to_string).collect())
    }

    pub fn from_tokens(tokens: &[&str]) -> Self {
        Self(tokens.iter().map(|t| t.to_string()).collect())
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// The name's only token, if it has exactly one
    pub fn sole_token(&self) -> Option<&str> {
        match self.0.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for ChunkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// A chunk: its raw lines, from begin marker to end marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    lines: Vec<String>,
}

impl Chunk {
    /// Start a chunk with its begin marker line
    pub fn open(begin_line: impl Into<String>) -> Self {
        Self {
            lines: vec![begin_line.into()],
        }
    }

    /// Kind recovered from the first line
    pub fn kind(&self) -> ChunkKind {
        match self.lines.first().map(|l| TagLine::classify(l)) {
            Some(TagLine::Begin(kind, _)) => kind,
            _ => ChunkKind::Docs,
        }
    }

    pub fn is_code(&self) -> bool {
        self.kind() == ChunkKind::Code
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Replace the whole line list
    pub fn replace_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }

    /// Name from the first `@defn` line, if any
    pub fn name(&self) -> Option<ChunkName> {
        self.lines.iter().find_map(|l| match TagLine::classify(l) {
            TagLine::Defn(name) => Some(name),
            _ => None,
        })
    }

    /// Like [`Chunk::name`], but a missing `@defn` is an error
    pub fn require_name(&self, id: ChunkId) -> Result<ChunkName> {
        self.name().ok_or(Error::MissingDefinition(id))
    }

    /// Names referenced by `@use` lines, in order
    pub fn uses(&self) -> impl Iterator<Item = ChunkName> + '_ {
        self.lines.iter().filter_map(|l| match TagLine::classify(l) {
            TagLine::Use(name) => Some(name),
            _ => None,
        })
    }
}

/// All chunks of a stream plus the hidden set, ordered by id
#[derive(Debug, Default)]
pub struct ChunkTable {
    chunks: BTreeMap<ChunkId, Chunk>,
    hidden: BTreeSet<ChunkId>,
}

impl ChunkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open chunk `id` with its begin marker.
    ///
    /// A second segment for an existing id is appended to the same line list.
    pub fn open(&mut self, id: ChunkId, begin_line: impl Into<String>) {
        match self.chunks.get_mut(&id) {
            Some(chunk) => chunk.push_line(begin_line),
            None => {
                self.chunks.insert(id, Chunk::open(begin_line));
            }
        }
    }

    pub fn get(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.get(&id)
    }

    pub fn get_mut(&mut self, id: ChunkId) -> Option<&mut Chunk> {
        self.chunks.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterate in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (ChunkId, &Chunk)> {
        self.chunks.iter().map(|(&id, chunk)| (id, chunk))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ChunkId, &mut Chunk)> {
        self.chunks.iter_mut().map(|(&id, chunk)| (id, chunk))
    }

    /// Iterate over code chunks in ascending id order
    pub fn code_chunks(&self) -> impl Iterator<Item = (ChunkId, &Chunk)> {
        self.iter().filter(|(_, c)| c.is_code())
    }

    pub fn mark_hidden(&mut self, id: ChunkId) {
        self.hidden.insert(id);
    }

    pub fn is_hidden(&self, id: ChunkId) -> bool {
        self.hidden.contains(&id)
    }

    /// Build the name → ids index over code chunks
    pub fn name_index(&self) -> NameIndex {
        let mut index = NameIndex::default();
        for (id, chunk) in self.code_chunks() {
            if let Some(name) = chunk.name() {
                index.by_name.entry(name).or_default().push(id);
            }
        }
        index
    }

    pub fn stats(&self) -> ChunkStats {
        let code = self.code_chunks().count();
        ChunkStats {
            code,
            docs: self.chunks.len() - code,
            hidden: self.hidden.len(),
        }
    }
}

/// One-to-many index from chunk name to the ids defining it
#[derive(Debug, Default)]
pub struct NameIndex {
    by_name: HashMap<ChunkName, Vec<ChunkId>>,
}

impl NameIndex {
    /// Ids of all chunks named `name`, ascending
    pub fn ids(&self, name: &ChunkName) -> &[ChunkId] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn names(&self) -> usize {
        self.by_name.len()
    }
}

/// Chunk counts for a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkStats {
    pub code: usize,
    pub docs: usize,
    pub hidden: usize,
}
