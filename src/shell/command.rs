//! Parsing of interactive command lines.
//!
//! A line is a case-insensitive verb followed by arguments. Names and numbers
//! are whitespace-delimited tokens; free text (insert/update text, snapshot
//! messages) is the rest of the line with a single separating space removed.

use std::str::FromStr;

use thiserror::Error;

use crate::models::VersionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create { name: Option<String> },
    Read { name: String },
    Insert { name: String, text: String },
    Update { name: String, text: String },
    Snapshot { name: String, message: String },
    Rollback { name: String, version: Option<VersionId> },
    History { name: String },
    Recent { count: Option<usize> },
    Biggest { count: Option<usize> },
    Rename { old: String, new: String },
    Switch { name: String, version: VersionId },
    Current { name: String },
    Tree { name: String },
    Leaves { name: String },
    Find { name: String, version: VersionId },
    Export { name: String },
    Delete { name: String },
    List,
    CommandHistory,
    Help,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}. Type HELP for a list of commands.")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// One row per command: usage line and description. Drives HELP output and
/// usage errors.
pub const COMMANDS: &[(&str, &str)] = &[
    ("CREATE [name]", "Create a document (untitledN if no name is given)"),
    ("READ <name>", "Show the active version's content"),
    ("INSERT <name> <text>", "Append text to the active version"),
    ("UPDATE <name> <text>", "Replace the active version's content"),
    ("SNAPSHOT <name> <message>", "Freeze the active version with a message"),
    ("ROLLBACK <name> [id]", "Move back to the parent, or to an ancestor by id"),
    ("HISTORY <name>", "List snapshots from the root to the active version"),
    ("RECENT [FILES] [n]", "Most recently accessed documents (default 5)"),
    ("BIGGEST [TREES] [n]", "Documents with the most versions (default 5)"),
    ("RENAME <old> <new>", "Rename a document"),
    ("SWITCH <name> <id>", "Make any version active"),
    ("CURRENT <name>", "Describe the active version"),
    ("TREE <name>", "Draw the version tree"),
    ("LEAVES <name>", "List versions without children"),
    ("FIND <name> <id>", "Describe one version"),
    ("EXPORT <name>", "Print the version tree as JSON"),
    ("DELETE <name>", "Remove a document and all its versions"),
    ("LIST", "List all documents"),
    ("COMMAND_HISTORY", "Show previously entered commands"),
    ("HELP", "Show this list"),
    ("EXIT", "Leave the session"),
];

fn usage(verb: &str) -> ParseError {
    let line = COMMANDS
        .iter()
        .find(|(usage, _)| usage.split_whitespace().next() == Some(verb))
        .map_or("HELP", |(usage, _)| *usage);
    ParseError::Usage(line)
}

/// Split off the next whitespace-delimited token.
fn next_token(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    Some(input.split_at(end))
}

/// Free text following a token: everything after one separating space.
fn remainder(rest: &str) -> String {
    rest.strip_prefix(' ').unwrap_or(rest).to_owned()
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (verb, rest) = next_token(line).ok_or(ParseError::Empty)?;
        let verb = verb.to_ascii_uppercase();

        let name = |rest: &str| -> Result<String, ParseError> {
            next_token(rest)
                .map(|(name, _)| name.to_owned())
                .ok_or_else(|| usage(&verb))
        };
        let name_and_text = |rest: &str| -> Result<(String, String), ParseError> {
            let (name, text) = next_token(rest).ok_or_else(|| usage(&verb))?;
            Ok((name.to_owned(), remainder(text)))
        };
        let name_and_id = |rest: &str| -> Result<(String, VersionId), ParseError> {
            let (name, rest) = next_token(rest).ok_or_else(|| usage(&verb))?;
            let version = next_token(rest)
                .and_then(|(id, _)| id.parse().ok())
                .ok_or_else(|| usage(&verb))?;
            Ok((name.to_owned(), version))
        };
        // Optional keyword (FILES/TREES) then optional count.
        let count = |rest: &str, keyword: &str| -> Result<Option<usize>, ParseError> {
            let mut rest = rest;
            if let Some((token, after)) = next_token(rest) {
                if token.eq_ignore_ascii_case(keyword) {
                    rest = after;
                }
            }
            match next_token(rest) {
                None => Ok(None),
                Some((n, _)) => n.parse().map(Some).map_err(|_| usage(&verb)),
            }
        };

        let command = match verb.as_str() {
            "CREATE" => Self::Create {
                name: next_token(rest).map(|(name, _)| name.to_owned()),
            },
            "READ" => Self::Read { name: name(rest)? },
            "INSERT" => {
                let (name, text) = name_and_text(rest)?;
                Self::Insert { name, text }
            }
            "UPDATE" => {
                let (name, text) = name_and_text(rest)?;
                Self::Update { name, text }
            }
            "SNAPSHOT" => {
                let (name, message) = name_and_text(rest)?;
                Self::Snapshot { name, message }
            }
            "ROLLBACK" => {
                let (name, rest) = next_token(rest).ok_or_else(|| usage(&verb))?;
                let version = match next_token(rest) {
                    None => None,
                    Some((id, _)) => Some(id.parse().map_err(|_| usage(&verb))?),
                };
                Self::Rollback {
                    name: name.to_owned(),
                    version,
                }
            }
            "HISTORY" => Self::History { name: name(rest)? },
            "RECENT" => Self::Recent {
                count: count(rest, "FILES")?,
            },
            "BIGGEST" => Self::Biggest {
                count: count(rest, "TREES")?,
            },
            "RENAME" => {
                let (old, rest) = next_token(rest).ok_or_else(|| usage(&verb))?;
                let (new, _) = next_token(rest).ok_or_else(|| usage(&verb))?;
                Self::Rename {
                    old: old.to_owned(),
                    new: new.to_owned(),
                }
            }
            "SWITCH" => {
                let (name, version) = name_and_id(rest)?;
                Self::Switch { name, version }
            }
            "CURRENT" | "CURRENT_VERSION" => Self::Current { name: name(rest)? },
            "TREE" => Self::Tree { name: name(rest)? },
            "LEAVES" => Self::Leaves { name: name(rest)? },
            "FIND" => {
                let (name, version) = name_and_id(rest)?;
                Self::Find { name, version }
            }
            "EXPORT" => Self::Export { name: name(rest)? },
            "DELETE" => Self::Delete { name: name(rest)? },
            "LIST" => Self::List,
            "COMMAND_HISTORY" => Self::CommandHistory,
            "HELP" => Self::Help,
            "EXIT" | "QUIT" => Self::Exit,
            _ => return Err(ParseError::Unknown(verb.clone())),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_keeps_inner_spacing() {
        let command: Command = "insert notes  two  spaces ".parse().unwrap();
        assert_eq!(
            command,
            Command::Insert {
                name: "notes".into(),
                text: " two  spaces ".into()
            }
        );
    }

    #[test]
    fn rollback_id_is_optional() {
        assert_eq!(
            "ROLLBACK notes".parse::<Command>(),
            Ok(Command::Rollback {
                name: "notes".into(),
                version: None
            })
        );
        assert_eq!(
            "ROLLBACK notes 3".parse::<Command>(),
            Ok(Command::Rollback {
                name: "notes".into(),
                version: Some(3)
            })
        );
        assert_eq!(
            "ROLLBACK notes three".parse::<Command>(),
            Err(ParseError::Usage("ROLLBACK <name> [id]"))
        );
    }

    #[test]
    fn recent_accepts_legacy_keyword() {
        assert_eq!(
            "RECENT FILES 3".parse::<Command>(),
            Ok(Command::Recent { count: Some(3) })
        );
        assert_eq!("recent 2".parse::<Command>(), Ok(Command::Recent { count: Some(2) }));
        assert_eq!("BIGGEST".parse::<Command>(), Ok(Command::Biggest { count: None }));
    }

    #[test]
    fn missing_arguments_report_usage() {
        assert_eq!(
            "SWITCH notes".parse::<Command>(),
            Err(ParseError::Usage("SWITCH <name> <id>"))
        );
        assert_eq!("   ".parse::<Command>(), Err(ParseError::Empty));
        assert_eq!(
            "FLY away".parse::<Command>(),
            Err(ParseError::Unknown("FLY".into()))
        );
    }
}
