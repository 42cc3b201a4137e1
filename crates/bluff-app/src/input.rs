//! Line-oriented command input.
//!
//! Decouples application logic from the terminal: the driver hands over whole
//! lines and [`Command::parse`] turns them into commands. Cards are named
//! either by their 1-based position in the displayed hand or by label.

use bluff_proto::Card;
use thiserror::Error;

/// Reference to a card in the local hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardRef {
    /// 1-based position in the organized hand.
    Index(usize),
    /// Exact wire label.
    Label(Card),
}

/// Parsed user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the command list.
    Help,
    /// Join the configured room.
    Join,
    /// Change display name.
    Name(String),
    /// Replace the selection.
    Select(Vec<CardRef>),
    /// Toggle cards in the selection.
    Toggle(Vec<CardRef>),
    /// Deselect everything.
    Clear,
    /// Play the selection, optionally with the rank to declare.
    Play(Option<String>),
    /// Pass the turn.
    Skip,
    /// Challenge the last play.
    Bluff,
    /// Ask for a new deal.
    NewGame,
    /// Drop the connection and connect again.
    Reconnect,
    /// Exit.
    Quit,
}

/// Input that is not a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Blank line.
    #[error("type a command, or 'help'")]
    Empty,

    /// First word is not a command.
    #[error("unknown command {0:?}, try 'help'")]
    Unknown(String),

    /// Command needs an argument.
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    /// Position 0 is not a card.
    #[error("card positions start at 1")]
    ZeroIndex,
}

/// One line per command, shown by `help`.
pub const HELP: &str = "\
commands:
  select <cards>   choose cards by position or label (s)
  toggle <cards>   add or remove cards from the selection (t)
  clear            deselect everything
  play [rank]      play the selection, declaring a rank if the round has none (p)
  skip             pass your turn
  bluff            call bluff on the last play (b)
  name <name>      change your display name
  new              request a new game
  join             join the room again
  reconnect        reconnect to the server
  quit             exit (q)";

impl Command {
    /// Parse one input line.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let head = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        let rest: Vec<&str> = words.collect();

        let command = match head.as_str() {
            "help" | "?" | "h" => Self::Help,
            "join" => Self::Join,
            "name" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("name"));
                }
                Self::Name(rest.join(" "))
            },
            "select" | "s" => Self::Select(parse_cards(&rest, "select")?),
            "toggle" | "t" => Self::Toggle(parse_cards(&rest, "toggle")?),
            "clear" | "c" => Self::Clear,
            "play" | "p" => Self::Play(rest.first().map(|rank| (*rank).to_string())),
            "skip" => Self::Skip,
            "bluff" | "b" | "call" => Self::Bluff,
            "new" | "newgame" => Self::NewGame,
            "reconnect" => Self::Reconnect,
            "quit" | "exit" | "q" => Self::Quit,
            _ => return Err(CommandError::Unknown(head)),
        };
        Ok(command)
    }
}

fn parse_cards(words: &[&str], command: &'static str) -> Result<Vec<CardRef>, CommandError> {
    if words.is_empty() {
        return Err(CommandError::MissingArgument(command));
    }
    words.iter().map(|word| parse_card(word)).collect()
}

/// Bare numbers are positions; anything else is a label, since every label
/// ends in a suit glyph.
fn parse_card(word: &str) -> Result<CardRef, CommandError> {
    match word.parse::<usize>() {
        Ok(0) => Err(CommandError::ZeroIndex),
        Ok(index) => Ok(CardRef::Index(index)),
        Err(_) => Ok(CardRef::Label(Card::from(word))),
    }
}
