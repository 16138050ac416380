//! Console rendering of the voice session state

use colored::{ColoredString, Colorize};
use voiceai_domain::{ConnectionStatus, LlmProvider, SessionState, SpeakingParty};

/// Formats [`SessionState`] snapshots for the terminal
pub struct StateFormatter;

impl StateFormatter {
    /// Bilingual label shown next to the status dot
    pub fn status_label(status: ConnectionStatus) -> &'static str {
        match status {
            ConnectionStatus::Connected => "已连接 | Connected",
            ConnectionStatus::Connecting => "连接中 | Connecting",
            ConnectionStatus::Disconnected => "未连接 | Disconnected",
            ConnectionStatus::Failed => "连接失败 | Failed",
        }
    }

    fn status_dot(status: ConnectionStatus) -> ColoredString {
        match status {
            ConnectionStatus::Connected => "●".green(),
            ConnectionStatus::Connecting => "●".yellow(),
            ConnectionStatus::Disconnected => "●".bright_black(),
            ConnectionStatus::Failed => "●".red(),
        }
    }

    /// `● 已连接 | Connected  ·  豆包 | Doubao`
    pub fn status_line(state: &SessionState) -> String {
        let status = state.connection_status();
        let label = match status {
            ConnectionStatus::Connected => Self::status_label(status).green().bold(),
            ConnectionStatus::Failed => Self::status_label(status).red().bold(),
            _ => Self::status_label(status).normal(),
        };
        format!(
            "{} {}  ·  {}",
            Self::status_dot(status),
            label,
            state.llm_provider().label().cyan()
        )
    }

    /// Transcript area; a failed session shows its error in its place.
    pub fn transcript_line(state: &SessionState) -> String {
        if state.connection_status() == ConnectionStatus::Failed
            && let Some(error) = state.last_error()
        {
            return format!("{} {}", "Error:".red().bold(), error);
        }

        let transcript = state.transcript();
        if transcript.is_placeholder() {
            transcript.as_text().dimmed().to_string()
        } else {
            transcript.as_text().to_string()
        }
    }

    pub fn speaking_line(party: SpeakingParty) -> String {
        match party {
            SpeakingParty::User => format!("{} {}", "🎤".normal(), "You are speaking...".dimmed()),
            SpeakingParty::Bot => format!("{} {}", "🔊".normal(), "Bot is speaking...".dimmed()),
        }
    }

    /// Full status block for `/status`
    pub fn format(state: &SessionState) -> String {
        let mut output = String::new();
        output.push_str(&Self::status_line(state));
        output.push('\n');
        output.push_str(&format!(
            "{} {}\n",
            "Transcript:".cyan().bold(),
            Self::transcript_line(state)
        ));
        if let Some(party) = state.speaking() {
            output.push_str(&Self::speaking_line(party));
            output.push('\n');
        }
        output
    }

    /// Lines describing what changed between two published states.
    ///
    /// Empty when nothing visible changed.
    pub fn format_update(previous: &SessionState, current: &SessionState) -> Vec<String> {
        let mut lines = Vec::new();

        if previous.connection_status() != current.connection_status()
            || previous.llm_provider() != current.llm_provider()
        {
            lines.push(Self::status_line(current));
        }

        let error_changed = current.connection_status() == ConnectionStatus::Failed
            && previous.last_error() != current.last_error();
        if previous.transcript() != current.transcript() || error_changed {
            lines.push(format!("  {}", Self::transcript_line(current)));
        }

        if previous.speaking() != current.speaking()
            && let Some(party) = current.speaking()
        {
            lines.push(format!("  {}", Self::speaking_line(party)));
        }

        lines
    }

    /// Provider options with the selected one marked
    pub fn format_providers(selected: LlmProvider) -> String {
        let mut output = String::new();
        for provider in LlmProvider::ALL {
            if provider == selected {
                output.push_str(&format!(
                    "  {} {:<8} {}\n",
                    "*".green().bold(),
                    provider.as_str().bold(),
                    provider.label()
                ));
            } else {
                output.push_str(&format!(
                    "    {:<8} {}\n",
                    provider.as_str(),
                    provider.label()
                ));
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voiceai_domain::SessionEvent;

    fn plain() {
        colored::control::set_override(false);
    }

    fn connected(provider: LlmProvider) -> SessionState {
        let mut state = SessionState::new(provider);
        state.begin_connect();
        state.apply(&SessionEvent::Connected);
        state
    }

    #[test]
    fn test_status_line_shows_label_and_provider() {
        plain();
        let line = StateFormatter::status_line(&connected(LlmProvider::Glm));
        assert_eq!(line, "● 已连接 | Connected  ·  智谱 GLM | Zhipu GLM");
    }

    #[test]
    fn test_failed_state_shows_error_in_place_of_transcript() {
        plain();
        let mut state = SessionState::new(LlmProvider::Doubao);
        state.begin_connect();
        state.fail("timeout");

        assert_eq!(StateFormatter::transcript_line(&state), "Error: timeout");
        let block = StateFormatter::format(&state);
        assert!(block.contains("连接失败 | Failed"));
        assert!(block.contains("Error: timeout"));
    }

    #[test]
    fn test_placeholder_transcript() {
        plain();
        let state = SessionState::new(LlmProvider::Doubao);
        assert_eq!(
            StateFormatter::transcript_line(&state),
            "等待输入... | Waiting for input..."
        );
    }

    #[test]
    fn test_format_update_reports_only_changes() {
        plain();
        let before = connected(LlmProvider::Doubao);
        let mut after = before.clone();
        after.apply(&SessionEvent::UserTranscription("你好".to_string()));

        assert_eq!(StateFormatter::format_update(&before, &after), vec!["  你好"]);
        assert!(StateFormatter::format_update(&after, &after).is_empty());
    }

    #[test]
    fn test_format_update_on_connection_lost() {
        plain();
        let before = connected(LlmProvider::Doubao);
        let mut after = before.clone();
        after.apply(&SessionEvent::Disconnected);

        let lines = StateFormatter::format_update(&before, &after);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("未连接 | Disconnected"));
        assert_eq!(lines[1], "  Connection lost");
    }

    #[test]
    fn test_format_update_shows_speaking_start() {
        plain();
        let before = connected(LlmProvider::Doubao);
        let mut after = before.clone();
        after.apply(&SessionEvent::BotStartedSpeaking);

        let lines = StateFormatter::format_update(&before, &after);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Bot is speaking"));
    }

    #[test]
    fn test_format_providers_marks_selection() {
        plain();
        let output = StateFormatter::format_providers(LlmProvider::Glm);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("    doubao"));
        assert!(lines[1].starts_with("  * glm"));
    }
}
