//! Per-dispatch route parameters.

/// Parameters the router extracts for the matched route.
///
/// Command routes receive the trailing arguments, text/inline routes receive
/// the matched text plus regex captures, callback routes receive the decoded
/// key/value pairs in wire order.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RouteParams {
    /// No parameters (catch-all dispatch).
    #[default]
    None,
    /// Trailing command arguments, split on the command's delimiter.
    Command(Vec<String>),
    /// Matched text plus captures; index 0 is the whole match, unmatched
    /// groups are `None`. Default routes carry empty captures.
    Text {
        text: String,
        captures: Vec<Option<String>>,
    },
    /// Decoded callback key/value pairs; a key without a value is `None`.
    Callback(Vec<(String, Option<String>)>),
}

impl RouteParams {
    /// Command arguments, empty for every other variant.
    pub fn args(&self) -> &[String] {
        match self {
            Self::Command(args) => args,
            _ => &[],
        }
    }

    /// Matched text for text/inline dispatches.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Regex capture by index (0 is the whole match).
    pub fn capture(&self, index: usize) -> Option<&str> {
        match self {
            Self::Text { captures, .. } => captures.get(index)?.as_deref(),
            _ => None,
        }
    }

    /// Value of a callback parameter; `None` for a missing key or a key
    /// registered without a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            Self::Callback(pairs) => pairs
                .iter()
                .find(|(k, _)| k == key)
                .and_then(|(_, v)| v.as_deref()),
            _ => None,
        }
    }

    /// Whether a callback parameter key is present at all.
    pub fn contains(&self, key: &str) -> bool {
        match self {
            Self::Callback(pairs) => pairs.iter().any(|(k, _)| k == key),
            _ => false,
        }
    }
}
