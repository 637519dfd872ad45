//! Line commands of the interactive shell.

use std::io::Write as _;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use emos_core::models::{FeatureDescriptor, FeatureId, UnitKind};

use super::loader::ModuleSource;
use super::{Shell, ShellError};
use crate::client::ProcessBackend;

pub const HELP: &str = "\
Commands:
  features                        list every feature
  open <id> [name] [| description] open a feature panel
  set <key> <value>               change an input of the open panel
  run                             start processing
  wait                            wait for the current run to finish
  show                            redraw the current view
  close                           back to the welcome view
  chat                            open the assistant chat
  say <text>                      send a chat message
  toggle <kind> <key>             flip a database, generator or predictor
  help                            this text
  quit                            leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Features,
    Open {
        id: FeatureId,
        name: Option<String>,
        description: Option<String>,
    },
    Set {
        key: String,
        value: String,
    },
    Run,
    Wait,
    Show,
    Close,
    Chat,
    Say(String),
    Toggle {
        kind: UnitKind,
        key: String,
    },
    Help,
    Quit,
}

/// Parse one input line. Blank lines give `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "features" | "ls" => Command::Features,
        "open" => parse_open(rest)?,
        "set" => {
            let (key, value) = rest
                .split_once(char::is_whitespace)
                .map(|(k, v)| (k, v.trim()))
                .unwrap_or((rest, ""));
            if key.is_empty() {
                return Err("usage: set <key> <value>".to_string());
            }
            Command::Set {
                key: key.to_string(),
                value: value.to_string(),
            }
        }
        "run" | "process" => Command::Run,
        "wait" => Command::Wait,
        "show" => Command::Show,
        "close" | "home" => Command::Close,
        "chat" => Command::Chat,
        "say" => Command::Say(rest.to_string()),
        "toggle" => {
            let mut parts = rest.split_whitespace();
            let (Some(kind), Some(key)) = (parts.next(), parts.next()) else {
                return Err("usage: toggle <database|generator|predictor> <key>".to_string());
            };
            let kind = UnitKind::from_str(&kind.to_ascii_lowercase())
                .ok_or_else(|| format!("unknown unit kind '{}'", kind))?;
            Command::Toggle {
                kind,
                key: key.to_string(),
            }
        }
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(Some(command))
}

fn parse_open(rest: &str) -> Result<Command, String> {
    let (head, description) = match rest.split_once('|') {
        Some((head, description)) => (head.trim(), Some(description.trim().to_string())),
        None => (rest, None),
    };
    let (id, name) = match head.split_once(char::is_whitespace) {
        Some((id, name)) => (id, Some(name.trim().to_string())),
        None => (head, None),
    };
    let id = id
        .parse::<FeatureId>()
        .map_err(|_| format!("'{}' is not a feature id", id))?;
    Ok(Command::Open {
        id,
        name: name.filter(|n| !n.is_empty()),
        description,
    })
}

/// What the loop prints after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Render,
    Text(String),
    Quit,
}

pub async fn execute<S: ModuleSource, B: ProcessBackend>(
    shell: &mut Shell<S, B>,
    command: Command,
) -> Result<Outcome, ShellError> {
    let outcome = match command {
        Command::Features => Outcome::Text(
            shell
                .registry()
                .entries()
                .map(|e| format!("{:>3}  {:<28} {}", e.id, e.name, e.category.title()))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        Command::Open {
            id,
            name,
            description,
        } => {
            if name.is_none() && description.is_none() {
                shell.open_feature(id).await;
            } else {
                let known = shell.registry().descriptor(id);
                let descriptor = FeatureDescriptor::new(
                    id,
                    name.unwrap_or(known.name),
                    description.unwrap_or(known.description),
                );
                shell.select_feature(descriptor).await;
            }
            Outcome::Render
        }
        Command::Set { key, value } => {
            shell.set_input(&key, &value)?;
            Outcome::Render
        }
        Command::Run => {
            if shell.start_processing()? {
                Outcome::Render
            } else {
                Outcome::Text("Already processing".to_string())
            }
        }
        Command::Wait => {
            shell.wait_for_processing().await;
            Outcome::Render
        }
        Command::Show => Outcome::Render,
        Command::Close => {
            shell.close();
            Outcome::Render
        }
        Command::Chat => {
            shell.open_chat();
            Outcome::Render
        }
        Command::Say(text) => {
            shell.send_chat(&text).await?;
            Outcome::Render
        }
        Command::Toggle { kind, key } => {
            let active = shell.toggle_unit(kind, &key).await?;
            Outcome::Text(format!(
                "{} {} {}",
                kind.as_str(),
                key,
                if active { "on" } else { "off" }
            ))
        }
        Command::Help => Outcome::Text(HELP.to_string()),
        Command::Quit => Outcome::Quit,
    };
    Ok(outcome)
}

fn prompt() {
    print!("emos> ");
    let _ = std::io::stdout().flush();
}

/// Read commands from stdin until `quit` or end of input.
pub async fn run<S: ModuleSource, B: ProcessBackend>(mut shell: Shell<S, B>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", shell.render());
    prompt();

    while let Some(line) = lines.next_line().await? {
        match parse(&line) {
            Ok(None) => {}
            Ok(Some(command)) => match execute(&mut shell, command).await {
                Ok(Outcome::Quit) => break,
                Ok(Outcome::Render) => println!("{}", shell.render()),
                Ok(Outcome::Text(text)) => println!("{}", text),
                Err(e) => println!("error: {}", e),
            },
            Err(message) => println!("{}", message),
        }
        prompt();
    }

    shell.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_open_with_name_and_description() {
        assert_eq!(
            parse("open 99 Custom Tool | does things").unwrap(),
            Some(Command::Open {
                id: FeatureId(99),
                name: Some("Custom Tool".into()),
                description: Some("does things".into()),
            })
        );
        assert_eq!(
            parse("open 3").unwrap(),
            Some(Command::Open {
                id: FeatureId(3),
                name: None,
                description: None,
            })
        );
        assert!(parse("open three").is_err());
    }

    #[test]
    fn set_keeps_spaces_in_value() {
        assert_eq!(
            parse("set latticeParams 5.43, 5.43, 5.43").unwrap(),
            Some(Command::Set {
                key: "latticeParams".into(),
                value: "5.43, 5.43, 5.43".into(),
            })
        );
    }

    #[test]
    fn toggle_accepts_plural_kinds() {
        assert_eq!(
            parse("toggle generators mattergen").unwrap(),
            Some(Command::Toggle {
                kind: UnitKind::Generator,
                key: "mattergen".into(),
            })
        );
        assert!(parse("toggle engines x").is_err());
        assert!(parse("toggle database").is_err());
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse("   ").unwrap(), None);
        assert!(parse("frobnicate").unwrap_err().contains("unknown command"));
    }
}
