//! Slash command parsing for the voice shell

use voiceai_domain::LlmProvider;

/// A parsed line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Connect with the given provider, or the selected one
    Connect(Option<LlmProvider>),
    Disconnect,
    /// Select a provider, or show the selected one
    Provider(Option<LlmProvider>),
    Providers,
    Status,
    /// Typed utterance (`/say <text>` or bare text)
    Say(String),
    Help,
    Quit,
}

impl ReplCommand {
    /// Parse one non-empty, trimmed input line.
    pub fn parse(line: &str) -> Result<Self, String> {
        let Some(command) = line.strip_prefix('/') else {
            return Ok(ReplCommand::Say(line.to_string()));
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (command, None),
        };

        match name {
            "connect" | "c" => Ok(ReplCommand::Connect(arg.map(parse_provider).transpose()?)),
            "disconnect" | "d" => Ok(ReplCommand::Disconnect),
            "provider" | "p" => Ok(ReplCommand::Provider(arg.map(parse_provider).transpose()?)),
            "providers" => Ok(ReplCommand::Providers),
            "status" | "s" => Ok(ReplCommand::Status),
            "say" => arg
                .map(|text| ReplCommand::Say(text.to_string()))
                .ok_or_else(|| "Usage: /say <text>".to_string()),
            "help" | "h" | "?" => Ok(ReplCommand::Help),
            "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
            _ => Err(format!(
                "Unknown command: /{}\nType /help for available commands",
                name
            )),
        }
    }
}

fn parse_provider(value: &str) -> Result<LlmProvider, String> {
    value.parse::<LlmProvider>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connect() {
        assert_eq!(ReplCommand::parse("/connect"), Ok(ReplCommand::Connect(None)));
        assert_eq!(
            ReplCommand::parse("/connect glm"),
            Ok(ReplCommand::Connect(Some(LlmProvider::Glm)))
        );
        assert!(ReplCommand::parse("/connect gpt").is_err());
    }

    #[test]
    fn test_parse_provider() {
        assert_eq!(ReplCommand::parse("/provider"), Ok(ReplCommand::Provider(None)));
        assert_eq!(
            ReplCommand::parse("/p  Doubao "),
            Ok(ReplCommand::Provider(Some(LlmProvider::Doubao)))
        );
        assert_eq!(ReplCommand::parse("/providers"), Ok(ReplCommand::Providers));
    }

    #[test]
    fn test_parse_say_and_bare_text() {
        assert_eq!(
            ReplCommand::parse("/say 今天天气怎么样"),
            Ok(ReplCommand::Say("今天天气怎么样".to_string()))
        );
        assert_eq!(
            ReplCommand::parse("hello there"),
            Ok(ReplCommand::Say("hello there".to_string()))
        );
        assert!(ReplCommand::parse("/say").is_err());
    }

    #[test]
    fn test_parse_aliases_and_unknown() {
        assert_eq!(ReplCommand::parse("/q"), Ok(ReplCommand::Quit));
        assert_eq!(ReplCommand::parse("/exit"), Ok(ReplCommand::Quit));
        assert_eq!(ReplCommand::parse("/?"), Ok(ReplCommand::Help));
        assert_eq!(ReplCommand::parse("/d"), Ok(ReplCommand::Disconnect));

        let err = ReplCommand::parse("/dance").unwrap_err();
        assert!(err.starts_with("Unknown command: /dance"));
    }
}
