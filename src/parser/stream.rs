// Stream parser: rebuilds the chunk table from noweb's tagged lines

use crate::analysis::{ChunkId, ChunkKind, ChunkTable};
use crate::error::{Error, Result};
use crate::parser::line::{is_file_directive, TagLine};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

/// Scanner position in the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    InCode(ChunkId),
    InDocs(ChunkId),
}

impl ScanState {
    fn current(&self) -> Option<ChunkId> {
        match *self {
            ScanState::Outside => None,
            ScanState::InCode(id) | ScanState::InDocs(id) => Some(id),
        }
    }
}

/// Parses a tagged stream into a [`ChunkTable`]
pub struct StreamParser<'a> {
    target: &'a str,
}

impl<'a> StreamParser<'a> {
    /// `target` is the file name whose `@file` line is echoed
    pub fn new(target: &'a str) -> Self {
        Self { target }
    }

    /// Read the whole stream.
    ///
    /// The matching `@file` line is written to `echo` as soon as it is read;
    /// everything else ends up in the returned table.
    pub fn parse<R: BufRead, W: Write>(&self, mut reader: R, echo: &mut W) -> Result<ChunkTable> {
        let mut table = ChunkTable::new();
        let mut state = ScanState::Outside;
        let mut skip_next = false;
        let mut line_no = 0;
        let mut line = String::new();

        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            line_no += 1;

            if skip_next {
                skip_next = false;
                continue;
            }

            if is_file_directive(&line, self.target) {
                echo.write_all(line.as_bytes())?;
                continue;
            }

            match TagLine::classify(&line) {
                TagLine::BadMarker(message) => return Err(Error::structural(line_no, message)),
                TagLine::Begin(kind, id) => {
                    if let Some(open) = state.current() {
                        return Err(Error::structural(
                            line_no,
                            format!(
                                "chunk {} opened while chunk {} is still open (nested chunks are rejected, stricter than noweb requires)",
                                id, open
                            ),
                        ));
                    }
                    table.open(id, line.as_str());
                    state = match kind {
                        ChunkKind::Code => ScanState::InCode(id),
                        ChunkKind::Docs => ScanState::InDocs(id),
                    };
                }
                TagLine::End(_, id) => {
                    let open = state.current().ok_or_else(|| {
                        Error::structural(line_no, format!("end of chunk {} outside any chunk", id))
                    })?;
                    if open != id {
                        return Err(Error::MismatchedEnd {
                            line: line_no,
                            expected: open,
                            found: id,
                        });
                    }
                    push(&mut table, open, &line);
                    state = ScanState::Outside;
                }
                TagLine::Hidden => {
                    // The sentinel is always followed by its own @nl, which goes too.
                    skip_next = true;
                    match state.current() {
                        Some(id) => {
                            debug!(chunk = %id, "chunk marked hidden");
                            table.mark_hidden(id);
                        }
                        None => warn!(line = line_no, "hidden marker outside any chunk ignored"),
                    }
                }
                _ => {
                    let open = state.current().ok_or_else(|| {
                        Error::structural(line_no, "content outside any chunk")
                    })?;
                    push(&mut table, open, &line);
                }
            }
        }

        if let Some(open) = state.current() {
            return Err(Error::structural(
                line_no,
                format!(
                "input ended while chunk {} is open (unterminated chunks are rejected, stricter than noweb requires)",
                open
            ),
            ));
        }

        Ok(table)
    }
}

fn push(table: &mut ChunkTable, id: ChunkId, line: &str) {
    if let Some(chunk) = table.get_mut(id) {
        chunk.push_line(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ChunkName;

    fn parse(input: &str) -> Result<(ChunkTable, String)> {
        let mut echo = Vec::new();
        let table = StreamParser::new("paper.nw").parse(input.as_bytes(), &mut echo)?;
        Ok((table, String::from_utf8(echo).unwrap()))
    }

    const SIMPLE: &str = "@file paper.nw\n\
@begin docs 0\n\
@text Intro\n\
@nl\n\
@end docs 0\n\
@begin code 1\n\
@defn main.cpp\n\
@nl\n\
@text int main() {}\n\
@nl\n\
@end code 1\n";

    #[test]
    fn test_parse_simple_stream() {
        let (table, echo) = parse(SIMPLE).unwrap();
        assert_eq!(echo, "@file paper.nw\n");
        assert_eq!(table.len(), 2);

        let docs = table.get(ChunkId(0)).unwrap();
        assert!(!docs.is_code());
        assert_eq!(docs.lines().len(), 4);

        let code = table.get(ChunkId(1)).unwrap();
        assert!(code.is_code());
        assert_eq!(code.lines().first().unwrap(), "@begin code 1\n");
        assert_eq!(code.lines().last().unwrap(), "@end code 1\n");
        assert_eq!(code.name(), Some(ChunkName::parse("main.cpp")));
    }

    #[test]
    fn test_terminators_are_preserved() {
        let input = "@begin code 1\r\n@defn a.c\r\n@text x\n@end code 1";
        let (table, _) = parse(input).unwrap();
        let lines = table.get(ChunkId(1)).unwrap().lines();
        assert_eq!(lines[0], "@begin code 1\r\n");
        assert_eq!(lines[2], "@text x\n");
        assert_eq!(lines[3], "@end code 1");
    }

    #[test]
    fn test_other_file_directive_is_content() {
        let input = "@begin docs 0\n@file other.nw\n@end docs 0\n";
        let (table, echo) = parse(input).unwrap();
        assert!(echo.is_empty());
        assert_eq!(table.get(ChunkId(0)).unwrap().lines()[1], "@file other.nw\n");
    }

    #[test]
    fn test_other_file_directive_outside_chunk_is_fatal() {
        let result = parse("@file other.nw\n");
        assert!(matches!(result, Err(Error::Structural { line: 1, .. })));
    }

    #[test]
    fn test_hidden_sentinel_skips_next_line() {
        let input = "@begin code 3\n\
@defn secret\n\
@text % HIDDEN\n\
@nl\n\
@text body\n\
@end code 3\n";
        let (table, _) = parse(input).unwrap();
        assert!(table.is_hidden(ChunkId(3)));
        let lines = table.get(ChunkId(3)).unwrap().lines();
        assert_eq!(
            lines,
            &["@begin code 3\n", "@defn secret\n", "@text body\n", "@end code 3\n"]
        );
    }

    #[test]
    fn test_hidden_skip_is_unconditional() {
        // the line after the sentinel is dropped whatever it holds
        let input = "@begin docs 0\n@text % HIDDEN\n@text dropped\n@end docs 0\n";
        let (table, _) = parse(input).unwrap();
        assert_eq!(table.get(ChunkId(0)).unwrap().lines().len(), 2);
    }

    #[test]
    fn test_hidden_outside_chunk_is_ignored() {
        let input = "@text % HIDDEN\n@nl\n@begin docs 0\n@end docs 0\n";
        let (table, _) = parse(input).unwrap();
        assert!(!table.is_hidden(ChunkId(0)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_mismatched_end_is_fatal() {
        let input = "@begin code 1\n@defn a\n@end code 2\n";
        match parse(input) {
            Err(Error::MismatchedEnd {
                line,
                expected,
                found,
            }) => {
                assert_eq!(line, 3);
                assert_eq!(expected, ChunkId(1));
                assert_eq!(found, ChunkId(2));
            }
            other => panic!("Expected mismatched end, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_content_outside_chunk_is_fatal() {
        let input = "@begin docs 0\n@end docs 0\n@text stray\n";
        assert!(matches!(parse(input), Err(Error::Structural { line: 3, .. })));
    }

    #[test]
    fn test_end_outside_chunk_is_fatal() {
        assert!(matches!(
            parse("@end docs 0\n"),
            Err(Error::Structural { line: 1, .. })
        ));
    }

    #[test]
    fn test_nested_begin_is_fatal() {
        let input = "@begin code 1\n@begin code 2\n";
        match parse(input) {
            Err(Error::Structural { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("stricter than noweb requires"));
            }
            other => panic!("Expected structural error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_truncated_input_is_fatal() {
        let input = "@begin code 1\n@defn a.c\n";
        match parse(input) {
            Err(Error::Structural { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("input ended while chunk 1 is open"));
                assert!(message.contains("stricter than noweb requires"));
            }
            other => panic!("Expected structural error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_bad_id_is_fatal() {
        assert!(matches!(
            parse("@begin code one\n"),
            Err(Error::Structural { line: 1, .. })
        ));
    }

    #[test]
    fn test_continuation_segment_merges() {
        let input = "@begin code 1\n@defn a\n@end code 1\n@begin code 1\n@text more\n@end code 1\n";
        let (table, _) = parse(input).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(ChunkId(1)).unwrap().lines().len(), 6);
    }
}
