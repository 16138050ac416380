//! Spinner shown while a connection attempt is pending

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use voiceai_domain::{ConnectionStatus, LlmProvider};

use crate::output::state_formatter::StateFormatter;

/// Reports a single connection attempt with an animated spinner
pub struct ConnectSpinner {
    bar: ProgressBar,
}

impl ConnectSpinner {
    /// Start spinning for an attempt with `provider`.
    pub fn start(provider: LlmProvider) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::spinner_style());
        bar.set_prefix(StateFormatter::status_label(ConnectionStatus::Connecting));
        bar.set_message(format!("{}...", provider.label()));
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// A spinner that draws nothing (quiet mode)
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.yellow} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Stop spinning and clear the line; the session watcher reports the outcome.
    pub fn finish(self) {
        self.bar.finish_and_clear();
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_spinner_finishes_quietly() {
        let spinner = ConnectSpinner::hidden();
        assert!(spinner.is_hidden());
        spinner.finish();
    }

    #[test]
    fn test_spinner_style_template_is_valid() {
        assert!(
            ProgressStyle::default_spinner()
                .template("{spinner:.yellow} {prefix:.bold} {msg}")
                .is_ok()
        );
    }
}
