//! Command and callback matching.
//!
//! [`CompiledCommand`] turns a [`Command`] definition plus the bot username
//! into two cached regexes: the matching rule and the parameter splitter.
//! Callback matching works on the comma-separated callback-data wire string.
//! Non-match is always a plain `false`/empty outcome, never an error.

use std::borrow::Cow;

use regex::Regex;
use router_core::{CallbackIdentifier, Command, Message, Result};

/// A command with its matching rule compiled against the bot username.
#[derive(Debug, Clone)]
pub struct CompiledCommand {
    command: Command,
    rule: Regex,
    splitter: Regex,
}

impl CompiledCommand {
    /// Builds the matching rule.
    ///
    /// Without subcommands: `(?i)^<prefix+name>(@<username>)?($|\s)`.
    /// With subcommands the name must be followed by whitespace, then the
    /// subcommand literals joined by the delimiter matcher, then end of
    /// string or one delimiter run.
    pub fn compile(command: Command, bot_username: &str) -> Result<Self> {
        let literal = regex::escape(&format!("{}{}", command.prefix(), command.name()));
        let username = regex::escape(bot_username);

        let pattern = if command.subcommands().is_empty() {
            format!(r"(?i)^{literal}(@{username})?($|\s)")
        } else {
            let delimiter = delimiter_pattern(command.delimiter());
            let subcommands = command
                .subcommands()
                .iter()
                .map(|s| regex::escape(s))
                .collect::<Vec<_>>()
                .join(&delimiter);
            format!(r"(?i)^{literal}(@{username})?\s+{subcommands}($|{delimiter})")
        };

        let rule = Regex::new(&pattern)?;
        let splitter = Regex::new(&delimiter_pattern(command.delimiter()))?;

        Ok(Self {
            command,
            rule,
            splitter,
        })
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Whether the message matches: requires text (or caption), an allowed
    /// chat kind, and the compiled rule.
    pub fn matches(&self, message: &Message) -> bool {
        let Some(text) = message_text(message) else {
            return false;
        };
        if !self.command.allows_chat(message.chat.kind) {
            return false;
        }
        self.rule.is_match(text)
    }

    /// Extracts the trailing parameters of a matched message: strips the
    /// matched rule, trims whitespace and delimiter characters at both ends,
    /// and splits the remainder on delimiter runs.
    pub fn params(&self, message: &Message) -> Vec<String> {
        let Some(text) = message_text(message) else {
            return Vec::new();
        };

        let delimiter = self.command.delimiter();
        let stripped = self.rule.replace(text, "");
        let trimmed =
            stripped.trim_matches(|c: char| c.is_whitespace() || delimiter.contains(c));
        if trimmed.is_empty() {
            return Vec::new();
        }

        self.splitter
            .split(trimmed)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Routing text of a message: `text`, else `caption`, else nothing.
pub(crate) fn message_text(message: &Message) -> Option<&str> {
    message.text.as_deref().or(message.caption.as_deref())
}

/// One-or-more run of the delimiter: the escaped character repeated for a
/// single-character delimiter, a character class drawn from the string for a
/// multi-character one.
fn delimiter_pattern(delimiter: &str) -> String {
    let mut chars = delimiter.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => format!("{}+", regex::escape(&c.to_string())),
        _ => {
            let mut class = String::new();
            for c in delimiter.chars() {
                // Escape the metacharacters that keep meaning inside a class.
                if matches!(c, '[' | ']' | '\\' | '^' | '-' | '&' | '~') {
                    class.push('\\');
                }
                class.push(c);
            }
            format!("[{class}]+")
        }
    }
}

/// Whether the callback-data string targets the identifier: the first
/// comma-separated field is url-decoded and compared case-insensitively
/// against the identifier's raw string.
pub fn callback_matches(identifier: &CallbackIdentifier, data: &str) -> bool {
    let field = data.split(',').next().unwrap_or("");
    decode_field(field).eq_ignore_ascii_case(identifier.as_str())
}

/// Decodes the key/value parameters of a callback-data string, preserving
/// wire order. The identifier field is dropped; each remaining field splits
/// on the first `=`, and a missing or empty value decodes to `None`.
pub fn parse_callback_params(data: &str) -> Vec<(String, Option<String>)> {
    data.split(',')
        .skip(1)
        .filter(|field| !field.is_empty())
        .map(|field| {
            let mut parts = field.splitn(2, '=');
            let key = decode_field(parts.next().unwrap_or(""));
            let value = parts
                .next()
                .filter(|v| !v.is_empty())
                .map(|v| decode_field(v));
            (key, value)
        })
        .collect()
}

/// Url-decodes a field, falling back to the raw text when the percent
/// escapes are not valid UTF-8.
fn decode_field(field: &str) -> String {
    urlencoding::decode(field)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| field.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use router_core::{Chat, ChatType};

    fn message_with_text(text: &str) -> Message {
        Message {
            message_id: 1,
            from: None,
            chat: Chat {
                id: 1,
                kind: ChatType::Private,
            },
            date: None,
            text: Some(text.to_string()),
            caption: None,
        }
    }

    fn compile(command: Command) -> CompiledCommand {
        CompiledCommand::compile(command, "ExampleBot").unwrap()
    }

    #[test]
    fn test_plain_command_requires_word_boundary() {
        let cmd = compile(Command::new("cmd").unwrap());
        assert!(cmd.matches(&message_with_text("/cmd")));
        assert!(cmd.matches(&message_with_text("/cmd arg")));
        assert!(!cmd.matches(&message_with_text("/cmdfoo")));
    }

    #[test]
    fn test_username_suffix_is_case_insensitive() {
        let cmd = compile(Command::new("cmd").unwrap());
        assert!(cmd.matches(&message_with_text("/cmd@ExampleBot")));
        assert!(cmd.matches(&message_with_text("/cmd@examplebot args")));
        assert!(!cmd.matches(&message_with_text("/cmd@OtherBot")));
    }

    #[test]
    fn test_caption_is_used_when_text_is_missing() {
        let cmd = compile(Command::new("caption_cmd").unwrap());
        let mut message = message_with_text("/caption_cmd");
        message.caption = message.text.take();
        assert!(cmd.matches(&message));

        message.caption = None;
        assert!(!cmd.matches(&message));
    }

    #[test]
    fn test_subcommands_with_multichar_delimiter_accept_any_run() {
        let cmd = compile(
            Command::new("cfg")
                .unwrap()
                .with_subcommands(["set", "mode"])
                .with_delimiter("_-"),
        );
        assert!(cmd.matches(&message_with_text("/cfg set_mode")));
        assert!(cmd.matches(&message_with_text("/cfg set--mode")));
        assert!(cmd.matches(&message_with_text("/cfg set_-_mode_value")));
        assert!(!cmd.matches(&message_with_text("/cfg set mode")));
    }

    #[test]
    fn test_params_split_on_delimiter_runs() {
        let cmd = compile(Command::new("add").unwrap());
        assert_eq!(
            cmd.params(&message_with_text("/add  one   two")),
            ["one", "two"]
        );
        assert!(cmd.params(&message_with_text("/add")).is_empty());
    }

    #[test]
    fn test_params_rejoined_reproduce_trailing_text() {
        let cmd = compile(Command::new("echo").unwrap());
        let params = cmd.params(&message_with_text("/echo a b c"));
        assert_eq!(params.join(cmd.command().delimiter()), "a b c");
    }

    #[test]
    fn test_chat_type_gate_blocks_disallowed_chats() {
        let cmd = compile(
            Command::new("secret")
                .unwrap()
                .allow_chat_types([ChatType::Private]),
        );
        let mut message = message_with_text("/secret");
        assert!(cmd.matches(&message));

        message.chat.kind = ChatType::Group;
        assert!(!cmd.matches(&message));
    }

    #[test]
    fn test_callback_identifier_compared_case_insensitively() {
        let id = CallbackIdentifier::new("act");
        assert!(callback_matches(&id, "act,a=1"));
        assert!(callback_matches(&id, "ACT"));
        assert!(!callback_matches(&id, "other,a=1"));
    }

    #[test]
    fn test_callback_params_decode_in_order() {
        let params = parse_callback_params("act,a=1,b=x%20y,flag");
        assert_eq!(
            params,
            vec![
                ("a".to_string(), Some("1".to_string())),
                ("b".to_string(), Some("x y".to_string())),
                ("flag".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_callback_empty_value_is_absent() {
        let params = parse_callback_params("act,k=");
        assert_eq!(params, vec![("k".to_string(), None)]);
    }
}
