//! Interactive commands read from stdin.

use std::str::FromStr;

use primex_common::{CommonError, CurrencyCode};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  amount <n>                 set the amount and convert
  from <code> | to <code>    set a currency and convert
  swap                       swap currencies and convert
  convert                    convert now
  link | embed               print the share or embed link
  alert <email> <threshold>  request a rate alert
  json                       print the last result as JSON
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Amount(String),
    From(CurrencyCode),
    To(CurrencyCode),
    Swap,
    Convert,
    Link,
    Embed,
    Alert { email: String, threshold: String },
    Json,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Currency(#[from] CommonError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CommandError::Usage("help"));
        };
        let args: Vec<&str> = words.collect();

        match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("amount", [n]) => Ok(Command::Amount(n.to_string())),
            ("amount", _) => Err(CommandError::Usage("amount <n>")),
            ("from", [code]) => Ok(Command::From(code.parse()?)),
            ("from", _) => Err(CommandError::Usage("from <code>")),
            ("to", [code]) => Ok(Command::To(code.parse()?)),
            ("to", _) => Err(CommandError::Usage("to <code>")),
            ("alert", [email, threshold]) => Ok(Command::Alert {
                email: email.to_string(),
                threshold: threshold.to_string(),
            }),
            ("alert", _) => Err(CommandError::Usage("alert <email> <threshold>")),
            ("swap", []) => Ok(Command::Swap),
            ("convert", []) => Ok(Command::Convert),
            ("link", []) => Ok(Command::Link),
            ("embed", []) => Ok(Command::Embed),
            ("json", []) => Ok(Command::Json),
            ("help", _) => Ok(Command::Help),
            ("quit" | "exit", _) => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(line.trim().to_string())),
        }
    }
}
