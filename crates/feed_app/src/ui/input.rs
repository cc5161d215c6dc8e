/// A line of user input, before it is resolved against the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Scroll to the bottom of the list; the sensor fires if it is mounted.
    Scroll,
    LoadMore,
    Tag(String),
    /// 1-based position in the rendered list.
    Open(usize),
    Like(usize),
    ShowAll,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "commands: scroll | more | tag <name> | open <n> | like <n> | all | help | quit";

pub fn parse_command(line: &str) -> Command {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Command::Scroll;
    };
    let arg = parts.next();

    match (head.to_ascii_lowercase().as_str(), arg) {
        ("scroll" | "s", None) => Command::Scroll,
        ("more" | "m", None) => Command::LoadMore,
        ("tag" | "t", Some(tag)) => Command::Tag(tag.trim_start_matches('#').to_string()),
        ("open" | "o", Some(n)) => parse_index(n).map_or_else(|| unknown(line), Command::Open),
        ("like" | "l", Some(n)) => parse_index(n).map_or_else(|| unknown(line), Command::Like),
        ("all" | "a", None) => Command::ShowAll,
        ("help" | "h" | "?", None) => Command::Help,
        ("quit" | "q" | "exit", None) => Command::Quit,
        _ => unknown(line),
    }
}

fn parse_index(raw: &str) -> Option<usize> {
    raw.parse().ok().filter(|n| *n > 0)
}

fn unknown(line: &str) -> Command {
    Command::Unknown(line.trim().to_string())
}
