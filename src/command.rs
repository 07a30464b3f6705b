use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Advance the world `n` generations. Bare `tick` means 1.
    Tick(u32),

    /// Write the session to a preset file.
    Dump(PathBuf),

    Help,
    Exit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Invalid argument for \"tick\": {got}")]
    InvalidTickCount { got: String },

    #[error("Command \"dump\" requires argument")]
    MissingDumpArg,

    #[error("Command \"{cmd}\" takes no arguments")]
    TrailingArgs { cmd: &'static str },

    #[error("Unknown command: {got}")]
    Unknown { got: String },

    #[error("Empty command")]
    Empty,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();

        let Some(word) = words.next() else {
            return Err(CommandError::Empty);
        };

        let arg = words.next();

        match word {
            "tick" => match arg {
                None => Ok(Command::Tick(1)),
                Some(n) => n
                    .parse()
                    .map(Command::Tick)
                    .map_err(|_| CommandError::InvalidTickCount { got: n.to_string() }),
            },

            "dump" => match arg {
                None => Err(CommandError::MissingDumpArg),
                Some(path) => Ok(Command::Dump(PathBuf::from(path))),
            },

            "help" => match arg {
                None => Ok(Command::Help),
                Some(_) => Err(CommandError::TrailingArgs { cmd: "help" }),
            },

            "exit" => match arg {
                None => Ok(Command::Exit),
                Some(_) => Err(CommandError::TrailingArgs { cmd: "exit" }),
            },

            other => Err(CommandError::Unknown {
                got: other.to_string(),
            }),
        }
    }
}
