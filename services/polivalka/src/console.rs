/// A line typed into the console host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Toggle,
    Set(bool),
    Quit,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "t" | "toggle" | "w" | "water" => Some(ConsoleCommand::Toggle),
            "on" | "1" => Some(ConsoleCommand::Set(true)),
            "off" | "0" => Some(ConsoleCommand::Set(false)),
            "q" | "quit" | "exit" => Some(ConsoleCommand::Quit),
            _ => None,
        }
    }
}

pub const HELP: &str = "commands: t|toggle|w|water, on|1, off|0, q|quit|exit";
