// Emitter: writes the chunk table back out as a tagged stream

use crate::analysis::ChunkTable;
use crate::error::Result;
use std::io::Write;

/// Write every visible chunk in ascending id order.
///
/// Lines are written exactly as stored. Returns the number of chunks
/// written.
pub fn emit<W: Write>(table: &ChunkTable, out: &mut W) -> Result<usize> {
    let mut written = 0;
    for (id, chunk) in table.iter() {
        if table.is_hidden(id) {
            continue;
        }
        for line in chunk.lines() {
            out.write_all(line.as_bytes())?;
        }
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ChunkId;

    fn table() -> ChunkTable {
        let mut table = ChunkTable::new();
        for id in [3, 1, 2] {
            table.open(ChunkId(id), format!("@begin docs {}\n", id));
            table
                .get_mut(ChunkId(id))
                .unwrap()
                .push_line(format!("@end docs {}\r\n", id));
        }
        table
    }

    #[test]
    fn test_emit_in_id_order() {
        let mut out = Vec::new();
        let written = emit(&table(), &mut out).unwrap();
        assert_eq!(written, 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "@begin docs 1\n@end docs 1\r\n@begin docs 2\n@end docs 2\r\n@begin docs 3\n@end docs 3\r\n"
        );
    }

    #[test]
    fn test_emit_skips_hidden() {
        let mut table = table();
        table.mark_hidden(ChunkId(2));
        let mut out = Vec::new();
        assert_eq!(emit(&table, &mut out).unwrap(), 2);
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("docs 2"));
        assert!(text.contains("docs 1"));
        assert!(text.contains("docs 3"));
    }

    #[test]
    fn test_emit_empty_table() {
        let mut out = Vec::new();
        assert_eq!(emit(&ChunkTable::new(), &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }
}
