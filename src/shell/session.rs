use std::io::{self, BufRead, Write};

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::models::VersionNode;
use crate::store::DocumentRegistry;

use super::command::{Command, COMMANDS};
use super::tree_render::render_version_tree;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const BANNER: &str = "Versioned documents ready. Type HELP for a list of commands.";
pub const SNAPSHOT_REMINDER: &str = "Reminder: consider taking a snapshot after important changes.";

/// Result of executing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Continue(String),
    Exit(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Self::Continue(text) | Self::Exit(text) => text,
        }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Exit(_))
    }
}

/// An interactive session over one [`DocumentRegistry`].
///
/// Every non-empty line is kept in the command history, whether or not it
/// parses. Errors are rendered into the reply; nothing here ends the session
/// except `EXIT` or end of input.
#[derive(Debug, Default)]
pub struct Session {
    registry: DocumentRegistry,
    config: SessionConfig,
    command_history: Vec<String>,
    executed: u64,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn registry(&self) -> &DocumentRegistry {
        &self.registry
    }

    /// Entered lines, oldest first.
    pub fn command_history(&self) -> &[String] {
        &self.command_history
    }

    pub fn execute(&mut self, line: &str) -> Reply {
        if line.trim().is_empty() {
            return Reply::Continue(String::new());
        }
        self.command_history.push(line.to_owned());

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => return Reply::Continue(e.to_string()),
        };
        if command == Command::Exit {
            return Reply::Exit("Exiting...".to_owned());
        }

        let mut output = self
            .dispatch(command)
            .unwrap_or_else(|e| format!("Error: {e}"));

        self.executed += 1;
        let interval = u64::from(self.config.reminder_interval);
        if interval > 0 && self.executed % interval == 0 {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(SNAPSHOT_REMINDER);
        }
        Reply::Continue(output)
    }

    /// Execute lines from `input` until `EXIT` or end of input, writing each
    /// reply to `output`.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        mut output: W,
        interactive: bool,
    ) -> io::Result<()> {
        tracing::info!("session started");
        if interactive {
            writeln!(output, "{BANNER}")?;
        }

        let mut lines = input.lines();
        loop {
            if interactive {
                write!(output, "> ")?;
                output.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;

            if self.config.echo_commands && !line.trim().is_empty() {
                writeln!(output, "> {line}")?;
            }
            let reply = self.execute(&line);
            if !reply.text().is_empty() {
                writeln!(output, "{}", reply.text())?;
            }
            if reply.is_exit() {
                break;
            }
        }

        tracing::info!(
            commands = self.executed,
            documents = self.registry.len(),
            "session ended"
        );
        Ok(())
    }

    fn dispatch(&mut self, command: Command) -> Result<String> {
        let registry = &mut self.registry;
        let text = match command {
            Command::Create { name } => {
                let name = registry.create(name.as_deref())?;
                format!("'{name}' has been created.")
            }
            Command::Read { name } => {
                let content = registry.read(&name)?;
                format!("'{name}' : {content}")
            }
            Command::Insert { name, text } => {
                let id = registry.insert(&name, &text)?;
                format!("'{name}' is at version {id}.")
            }
            Command::Update { name, text } => {
                let id = registry.update(&name, &text)?;
                format!("'{name}' is at version {id}.")
            }
            Command::Snapshot { name, message } => {
                let id = registry.snapshot(&name, &message)?;
                format!("Version {id} of '{name}' saved as a snapshot.")
            }
            Command::Rollback { name, version } => {
                let id = registry.rollback(&name, version.into())?;
                format!("'{name}' rolled back to version {id}.")
            }
            Command::History { name } => {
                let entries = registry.history(&name)?;
                let mut lines = vec![format!("History of '{name}':")];
                lines.extend(entries.iter().map(|entry| {
                    format!(
                        "V{} | {} | {}",
                        entry.id,
                        entry.snapshot_at.format(TIME_FORMAT),
                        entry.message
                    )
                }));
                lines.join("\n")
            }
            Command::Recent { count } => {
                let names = registry.recent(count.unwrap_or(self.config.recent_default));
                if names.is_empty() {
                    "No recent files.".to_owned()
                } else {
                    names.join("\n")
                }
            }
            Command::Biggest { count } => {
                let ranked = registry.biggest_trees(count.unwrap_or(self.config.biggest_default));
                if ranked.is_empty() {
                    "No files.".to_owned()
                } else {
                    ranked
                        .iter()
                        .map(|entry| format!("{} : {}", entry.key, entry.score))
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            Command::Rename { old, new } => {
                registry.rename(&old, &new)?;
                format!("File renamed from '{old}' to '{new}'.")
            }
            Command::Switch { name, version } => {
                let id = registry.switch_version(&name, version)?;
                format!("Switched to version {id} of '{name}'.")
            }
            Command::Current { name } => describe(&name, registry.active_version(&name)?),
            Command::Tree { name } => {
                let tree = registry.tree(&name)?;
                render_version_tree(&tree).trim_end().to_owned()
            }
            Command::Leaves { name } => {
                let ids: Vec<_> = registry
                    .leaf_versions(&name)?
                    .iter()
                    .map(|node| format!("V{}", node.id()))
                    .collect();
                format!("Leaf versions of '{name}': {}", ids.join(", "))
            }
            Command::Find { name, version } => {
                let node = registry
                    .find_version(&name, version)?
                    .ok_or(Error::VersionNotFound(version))?;
                describe(&name, node)
            }
            Command::Export { name } => {
                let tree = registry.tree(&name)?;
                serde_json::to_string_pretty(&tree)
                    .unwrap_or_else(|e| format!("Error: failed to serialise tree: {e}"))
            }
            Command::Delete { name } => {
                registry.remove(&name)?;
                format!("'{name}' has been deleted.")
            }
            Command::List => {
                let mut names = registry.list_all();
                if names.is_empty() {
                    "No files.".to_owned()
                } else {
                    names.sort();
                    names.join("\n")
                }
            }
            Command::CommandHistory => self
                .command_history
                .iter()
                .rev()
                .cloned()
                .collect::<Vec<_>>()
                .join("\n"),
            Command::Help => COMMANDS
                .iter()
                .map(|(usage, description)| format!("{usage:<27} : {description}"))
                .collect::<Vec<_>>()
                .join("\n"),
            Command::Exit => "Exiting...".to_owned(),
        };
        Ok(text)
    }
}

fn describe(name: &str, node: &VersionNode) -> String {
    let state = match node.snapshot_at() {
        Some(at) => format!("snapshot \"{}\" at {}", node.message(), at.format(TIME_FORMAT)),
        None => "draft".to_owned(),
    };
    format!(
        "V{} of '{}' ({})\n  created:  {}\n  modified: {}\n  content:  {}",
        node.id(),
        name,
        state,
        node.created_at().format(TIME_FORMAT),
        node.last_modified_at().format(TIME_FORMAT),
        node.content()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> Session {
        Session::new(SessionConfig {
            reminder_interval: 0,
            ..SessionConfig::default()
        })
    }

    #[test]
    fn reminder_every_interval() {
        let mut session = Session::new(SessionConfig {
            reminder_interval: 2,
            ..SessionConfig::default()
        });
        assert!(!session.execute("CREATE a").text().contains(SNAPSHOT_REMINDER));
        assert!(session.execute("READ a").text().ends_with(SNAPSHOT_REMINDER));
        assert!(!session.execute("LIST").text().contains(SNAPSHOT_REMINDER));
    }

    #[test]
    fn errors_are_rendered() {
        let mut session = quiet();
        assert_eq!(
            session.execute("READ ghost").text(),
            "Error: Document 'ghost' not found"
        );
    }

    #[test]
    fn history_records_unparsable_lines() {
        let mut session = quiet();
        session.execute("FLY");
        session.execute("");
        session.execute("LIST");
        assert_eq!(session.command_history(), &["FLY", "LIST"]);
    }
}
