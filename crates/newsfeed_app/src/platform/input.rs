use newsfeed_core::Msg;

/// One parsed line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Intent(Msg),
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  category <id>   (c)  show top headlines for a category
  search <text>   (s)  search all news
  more            (m)  load the next page
  online | offline     override connectivity until the probe sees the next real change
  help            (h)  show this help
  quit            (q)  exit
Categories: general, world, nation, business, technology, entertainment, sports, science, health";

/// Parses one line of input. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<Input> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let input = match command.to_ascii_lowercase().as_str() {
        "category" | "c" => Input::Intent(Msg::CategorySelected(rest.to_ascii_lowercase())),
        "search" | "s" => Input::Intent(Msg::SearchSubmitted(rest.to_string())),
        "more" | "m" => Input::Intent(Msg::ScrolledNearEnd),
        "online" => Input::Intent(Msg::ConnectivityChanged { online: true }),
        "offline" => Input::Intent(Msg::ConnectivityChanged { online: false }),
        "help" | "h" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    };
    Some(input)
}
