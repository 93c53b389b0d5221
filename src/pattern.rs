use crate::Error;

/// A file name pattern in glob syntax: `*` (any run of characters), `?`
/// (exactly one character) and `[...]` character classes.
///
/// `*`, `*.*` and the empty pattern match every name, including names
/// without an extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    raw: String,
    // None for the match-everything forms.
    glob: Option<glob::Pattern>,
}

impl Pattern {
    /// Compiles `raw`. Fails with [`Error::Parse`] on malformed syntax such as
    /// an unclosed `[`.
    pub fn new(raw: &str) -> Result<Self, Error> {
        let glob = if matches!(raw, "" | "*" | "*.*") {
            None
        } else {
            Some(glob::Pattern::new(raw).map_err(|e| Error::Parse {
                what: raw.to_string(),
                how: e.to_string(),
            })?)
        };
        Ok(Self {
            raw: raw.to_string(),
            glob,
        })
    }

    /// Pattern matching every name.
    pub fn any() -> Self {
        Self {
            raw: "*".to_string(),
            glob: None,
        }
    }

    /// Returns the textual form of the pattern.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Determines if `name` matches the pattern.
    pub fn matches(&self, name: &str) -> bool {
        self.glob.as_ref().is_none_or(|glob| glob.matches(name))
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self::any()
    }
}

impl TryFrom<&str> for Pattern {
    type Error = Error;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}
