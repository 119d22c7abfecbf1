use tagcanvas_core::{Msg, Tag};

pub(crate) const HELP: &str = "\
Commands:
  search <text>   update the tag search box (s)
  pick <n>        select suggestion number n
  add <tag>       select a tag by name
  remove <tag>    deselect a tag (rm)
  clear           deselect everything
  generate        render the selected tags (gen)
  prompt <text>   render free text instead of tags
  help            show this help
  quit            exit (q)";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Dispatch(Msg),
    Help,
    Quit,
    Nothing,
    Invalid(String),
}

pub(crate) fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Nothing;
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "search" | "s" => Command::Dispatch(Msg::SearchInputChanged(rest.to_string())),
        "pick" | "p" => match rest.parse::<usize>() {
            Ok(n) if n > 0 => Command::Dispatch(Msg::SuggestionChosen(n - 1)),
            _ => Command::Invalid(format!("pick expects a suggestion number, got {rest:?}")),
        },
        "add" | "a" => match Tag::new(rest) {
            Some(tag) => Command::Dispatch(Msg::TagSelected(tag)),
            None => Command::Invalid("add expects a tag".to_string()),
        },
        "remove" | "rm" => {
            if rest.is_empty() {
                Command::Invalid("remove expects a tag".to_string())
            } else {
                Command::Dispatch(Msg::TagRemoved(rest.to_string()))
            }
        }
        "clear" => Command::Dispatch(Msg::SelectionCleared),
        "generate" | "gen" | "go" => Command::Dispatch(Msg::GenerateClicked),
        "prompt" => Command::Dispatch(Msg::PromptSubmitted(rest.to_string())),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Invalid(format!("unknown command {other:?}; type help")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_keeps_inner_spaces() {
        assert_eq!(
            parse_command("search  red fox "),
            Command::Dispatch(Msg::SearchInputChanged("red fox".to_string()))
        );
        assert_eq!(
            parse_command("s"),
            Command::Dispatch(Msg::SearchInputChanged(String::new()))
        );
    }

    #[test]
    fn pick_is_one_based() {
        assert_eq!(
            parse_command("pick 1"),
            Command::Dispatch(Msg::SuggestionChosen(0))
        );
        assert!(matches!(parse_command("pick 0"), Command::Invalid(_)));
        assert!(matches!(parse_command("pick x"), Command::Invalid(_)));
    }

    #[test]
    fn add_and_remove_take_the_rest_of_the_line() {
        assert_eq!(
            parse_command("add  misty forest"),
            Command::Dispatch(Msg::TagSelected(Tag::new("misty forest").unwrap()))
        );
        assert!(matches!(parse_command("add"), Command::Invalid(_)));
        assert_eq!(
            parse_command("rm misty forest"),
            Command::Dispatch(Msg::TagRemoved("misty forest".to_string()))
        );
    }

    #[test]
    fn control_words() {
        assert_eq!(parse_command("   "), Command::Nothing);
        assert_eq!(parse_command("GEN"), Command::Dispatch(Msg::GenerateClicked));
        assert_eq!(parse_command("quit"), Command::Quit);
        assert_eq!(parse_command("help"), Command::Help);
        assert!(matches!(parse_command("dance"), Command::Invalid(_)));
    }

    #[test]
    fn prompt_passes_text_through() {
        assert_eq!(
            parse_command("prompt a lighthouse at dusk"),
            Command::Dispatch(Msg::PromptSubmitted("a lighthouse at dusk".to_string()))
        );
    }
}
