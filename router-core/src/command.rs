//! Command definitions.
//!
//! A [`Command`] is an immutable description of what a command route matches:
//! name, prefix, optional subcommand literals, the delimiter separating
//! subcommands and trailing parameters, and the chat kinds it is allowed in.
//! Compilation into a matching rule happens in the router, which knows the
//! bot username.

use std::fmt;

use crate::error::{Result, RouterError};
use crate::types::ChatType;

/// Chat kinds a command accepts when none were set explicitly.
const DEFAULT_CHAT_TYPES: [ChatType; 3] =
    [ChatType::Private, ChatType::Group, ChatType::Supergroup];

/// Immutable command definition.
///
/// Built with [`Command::new`] plus builder-style setters:
///
/// ```
/// use router_core::{ChatType, Command};
///
/// let cmd = Command::new("ban")?
///     .with_prefix("!")
///     .with_subcommands(["user"])
///     .allow_chat_types([ChatType::Group, ChatType::Supergroup]);
/// assert_eq!(cmd.to_string(), "!ban user");
/// # Ok::<(), router_core::RouterError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    name: String,
    prefix: String,
    subcommands: Vec<String>,
    delimiter: String,
    allowed_chat_types: Vec<ChatType>,
}

impl Command {
    /// Creates a command with prefix `/`, no subcommands and a single-space
    /// delimiter. A leading `/` in `name` is stripped; the remainder must
    /// contain at least one word character.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let name = name.trim_start_matches('/').to_string();
        if !name.chars().any(|c| c.is_alphanumeric() || c == '_') {
            return Err(RouterError::InvalidCommand(name));
        }

        Ok(Self {
            name,
            prefix: "/".to_string(),
            subcommands: Vec::new(),
            delimiter: " ".to_string(),
            allowed_chat_types: Vec::new(),
        })
    }

    /// Replaces the `/` prefix (e.g. `!` for moderation-style commands).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the ordered subcommand literals that must follow the name.
    pub fn with_subcommands<I, S>(mut self, subcommands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subcommands = subcommands.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the delimiter between subcommands and trailing parameters.
    ///
    /// A single-character delimiter matches one-or-more repeats of that
    /// character; a multi-character delimiter matches one-or-more characters
    /// drawn from the set (so `"_-"` accepts `_`, `--` or `_-_`).
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Restricts the chat kinds this command matches in. An empty set keeps
    /// the default of private, group and supergroup chats.
    pub fn allow_chat_types(mut self, kinds: impl IntoIterator<Item = ChatType>) -> Self {
        self.allowed_chat_types = kinds.into_iter().collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn subcommands(&self) -> &[String] {
        &self.subcommands
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Whether this command may match in a chat of the given kind.
    pub fn allows_chat(&self, kind: ChatType) -> bool {
        if self.allowed_chat_types.is_empty() {
            DEFAULT_CHAT_TYPES.contains(&kind)
        } else {
            self.allowed_chat_types.contains(&kind)
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.name)?;
        for sub in &self.subcommands {
            write!(f, " {sub}")?;
        }
        Ok(())
    }
}
