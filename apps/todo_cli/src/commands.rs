//! Line commands typed at the prompt, turned into intents for the sync controller.

use client_core::Intent;
use shared::domain::{ItemId, OwnerId};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  add <owner-id> <title...>   create an item
  done <item-id>              mark an item completed
  undo <item-id>              mark an item not completed
  rm <item-id>                delete an item
  help                        show this text
  quit                        exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command '{0}'; type 'help'")]
    Unknown(String),
    #[error("'{command}' needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("'{0}' is not a numeric owner id")]
    InvalidId(String),
}

pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "" => Command::Empty,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "add" => {
            let (owner, title) = rest
                .split_once(char::is_whitespace)
                .ok_or(ParseError::MissingArgument {
                    command: "add",
                    expected: "an owner id and a title",
                })?;
            Command::Intent(Intent::SubmitCreate {
                owner_id: parse_owner_id(owner)?,
                title: title.trim().to_string(),
            })
        }
        "done" | "undo" => {
            let completed = word == "done";
            let command = if completed { "done" } else { "undo" };
            Command::Intent(Intent::Toggle {
                item_id: ItemId::from(required(command, rest)?),
                completed,
            })
        }
        "rm" => Command::Intent(Intent::Close {
            item_id: ItemId::from(required("rm", rest)?),
        }),
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn required<'a>(command: &'static str, rest: &'a str) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        Err(ParseError::MissingArgument {
            command,
            expected: "an item id",
        })
    } else {
        Ok(rest)
    }
}

fn parse_owner_id(raw: &str) -> Result<OwnerId, ParseError> {
    raw.trim()
        .parse()
        .map(OwnerId)
        .map_err(|_| ParseError::InvalidId(raw.trim().to_string()))
}
