//! Line-oriented commands understood by the `kitchen` binary

use thiserror::Error;

use crate::actions::{self, KitchenAction};

pub const HELP: &str = "\
commands:
  kettle on|off      switch the kettle
  toaster on|off     switch the toaster
  power off          switch every appliance off
  dishes used|washed use or wash the dishes
  enter <name>       someone enters the kitchen
  leave <name>       someone leaves the kitchen
  state              print the kitchen
  help               print this help
  quit               leave the program";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(KitchenAction),
    ShowState,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),

    #[error("`{command}` expects {expected}")]
    BadArgument {
        command: &'static str,
        expected: &'static str,
    },
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let arg = rest.to_lowercase();

    let command = match word.to_lowercase().as_str() {
        "" => return Ok(None),
        "kettle" => Command::Dispatch(switch(
            "kettle",
            &arg,
            KitchenAction::TurnedKettleOn,
            KitchenAction::TurnedKettleOff,
        )?),
        "toaster" => Command::Dispatch(switch(
            "toaster",
            &arg,
            KitchenAction::TurnedToasterOn,
            KitchenAction::TurnedToasterOff,
        )?),
        "power" => match arg.as_str() {
            "off" => Command::Dispatch(KitchenAction::TurnedAllElectricalOff),
            _ => {
                return Err(CommandError::BadArgument {
                    command: "power",
                    expected: "`off`",
                })
            }
        },
        "dishes" => Command::Dispatch(match arg.as_str() {
            "used" => KitchenAction::DishesUsed,
            "washed" => KitchenAction::DishesWashed,
            _ => {
                return Err(CommandError::BadArgument {
                    command: "dishes",
                    expected: "`used` or `washed`",
                })
            }
        }),
        "enter" => Command::Dispatch(actions::someone_enters_the_kitchen(name("enter", rest)?)),
        "leave" => Command::Dispatch(actions::someone_leaves_the_kitchen(name("leave", rest)?)),
        "state" => Command::ShowState,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };

    Ok(Some(command))
}

fn switch(
    command: &'static str,
    arg: &str,
    on: KitchenAction,
    off: KitchenAction,
) -> Result<KitchenAction, CommandError> {
    match arg {
        "on" => Ok(on),
        "off" => Ok(off),
        _ => Err(CommandError::BadArgument {
            command,
            expected: "`on` or `off`",
        }),
    }
}

fn name<'a>(command: &'static str, arg: &'a str) -> Result<&'a str, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::BadArgument {
            command,
            expected: "a name",
        });
    }
    Ok(arg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_switches() {
        assert_eq!(
            parse("kettle on"),
            Ok(Some(Command::Dispatch(KitchenAction::TurnedKettleOn)))
        );
        assert_eq!(
            parse("  Toaster   OFF "),
            Ok(Some(Command::Dispatch(KitchenAction::TurnedToasterOff)))
        );
        assert_eq!(
            parse("power off"),
            Ok(Some(Command::Dispatch(KitchenAction::TurnedAllElectricalOff)))
        );
    }

    #[test]
    fn test_parse_dishes() {
        assert_eq!(
            parse("dishes used"),
            Ok(Some(Command::Dispatch(KitchenAction::DishesUsed)))
        );
        assert_eq!(
            parse("dishes washed"),
            Ok(Some(Command::Dispatch(KitchenAction::DishesWashed)))
        );
    }

    #[test]
    fn test_parse_names_keep_inner_spaces() {
        assert_eq!(
            parse("enter Mary Ann"),
            Ok(Some(Command::Dispatch(
                actions::someone_enters_the_kitchen("Mary Ann")
            )))
        );
        assert_eq!(
            parse("leave peter"),
            Ok(Some(Command::Dispatch(
                actions::someone_leaves_the_kitchen("peter")
            )))
        );
    }

    #[test]
    fn test_parse_meta_commands() {
        assert_eq!(parse("state"), Ok(Some(Command::ShowState)));
        assert_eq!(parse("help"), Ok(Some(Command::Help)));
        assert_eq!(parse("quit"), Ok(Some(Command::Quit)));
        assert_eq!(parse("   "), Ok(None));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse("fridge open"),
            Err(CommandError::Unknown("fridge".to_string()))
        );
        assert_eq!(
            parse("kettle boil"),
            Err(CommandError::BadArgument {
                command: "kettle",
                expected: "`on` or `off`",
            })
        );
        assert_eq!(
            parse("enter"),
            Err(CommandError::BadArgument {
                command: "enter",
                expected: "a name",
            })
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            parse("dishes dirty").unwrap_err().to_string(),
            "`dishes` expects `used` or `washed`"
        );
    }
}
