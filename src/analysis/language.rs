// Language tags and file-extension inference

use crate::analysis::ChunkName;
use std::collections::BTreeMap;
use std::fmt;

/// Language of a code chunk, as handed to the listing environment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Language {
    Ecl,
    Cpp,
    C,
    Yacc,
    Bash,
    Lex,
    /// A tag added through the `[languages]` config table
    Other(String),
}

impl Language {
    /// Parse a tag as written on an `@language` line
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "ECL" => Language::Ecl,
            "C++" => Language::Cpp,
            "C" => Language::C,
            "YACC" => Language::Yacc,
            "bash" => Language::Bash,
            "LEX" => Language::Lex,
            other => Language::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Language::Ecl => "ECL",
            Language::Cpp => "C++",
            Language::C => "C",
            Language::Yacc => "YACC",
            Language::Bash => "bash",
            Language::Lex => "LEX",
            Language::Other(tag) => tag,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered suffix → language table; first match wins
#[derive(Debug, Clone)]
pub struct ExtensionTable {
    entries: Vec<(String, Language)>,
}

impl Default for ExtensionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ExtensionTable {
    /// The built-in suffixes
    pub fn builtin() -> Self {
        let entries = [
            (".ecl", Language::Ecl),
            (".cpp", Language::Cpp),
            (".c", Language::C),
            (".h", Language::Cpp),
            (".y", Language::Yacc),
            (".sh", Language::Bash),
            (".l", Language::Lex),
        ];
        Self {
            entries: entries
                .into_iter()
                .map(|(suffix, lang)| (suffix.to_string(), lang))
                .collect(),
        }
    }

    /// Append extra suffixes, checked after the built-in ones
    pub fn with_extra(mut self, extra: &BTreeMap<String, String>) -> Self {
        for (suffix, tag) in extra {
            self.entries.push((suffix.clone(), Language::from_tag(tag)));
        }
        self
    }

    /// Infer a language from a single-token chunk name.
    ///
    /// Multi-token names never match, whatever they end with.
    pub fn infer(&self, name: &ChunkName) -> Option<Language> {
        let token = name.sole_token()?;
        self.entries
            .iter()
            .find(|(suffix, _)| token.ends_with(suffix.as_str()))
            .map(|(_, lang)| lang.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(name: &str) -> Option<Language> {
        ExtensionTable::builtin().infer(&ChunkName::parse(name))
    }

    #[test]
    fn test_builtin_extensions() {
        assert_eq!(infer("foo.cpp"), Some(Language::Cpp));
        assert_eq!(infer("foo.h"), Some(Language::Cpp));
        assert_eq!(infer("bar.c"), Some(Language::C));
        assert_eq!(infer("x.y"), Some(Language::Yacc));
        assert_eq!(infer("run.sh"), Some(Language::Bash));
        assert_eq!(infer("scan.l"), Some(Language::Lex));
        assert_eq!(infer("query.ecl"), Some(Language::Ecl));
    }

    #[test]
    fn test_suffixes_do_not_overlap() {
        // .cpp must not be read as .c, .sh not as .h, .ecl not as .l
        assert_eq!(infer("a.cpp"), Some(Language::Cpp));
        assert_eq!(infer("a.sh"), Some(Language::Bash));
        assert_eq!(infer("a.ecl"), Some(Language::Ecl));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(infer("helper"), None);
        assert_eq!(infer("notes.txt"), None);
        assert_eq!(infer("main.CPP"), None);
        assert_eq!(infer("cpp"), None);
    }

    #[test]
    fn test_multi_token_name_never_matches() {
        assert_eq!(infer("write main.cpp"), None);
        assert_eq!(infer("main.cpp again"), None);
    }

    #[test]
    fn test_extra_extensions() {
        let mut extra = BTreeMap::new();
        extra.insert(".rs".to_string(), "rust".to_string());
        extra.insert(".hpp".to_string(), "C++".to_string());
        let table = ExtensionTable::builtin().with_extra(&extra);

        assert_eq!(table.len(), 9);
        assert_eq!(
            table.infer(&ChunkName::parse("lib.rs")),
            Some(Language::Other("rust".to_string()))
        );
        assert_eq!(table.infer(&ChunkName::parse("x.hpp")), Some(Language::Cpp));
    }

    #[test]
    fn test_builtin_wins_over_extra() {
        let mut extra = BTreeMap::new();
        extra.insert(".c".to_string(), "objc".to_string());
        let table = ExtensionTable::builtin().with_extra(&extra);
        assert_eq!(table.infer(&ChunkName::parse("m.c")), Some(Language::C));
    }

    #[test]
    fn test_tag_round_trip_display() {
        for tag in ["ECL", "C++", "C", "YACC", "bash", "LEX", "rust"] {
            assert_eq!(Language::from_tag(tag).to_string(), tag);
        }
    }
}
