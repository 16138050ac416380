//! REPL (Read-Eval-Print Loop) for an interactive voice session

use crate::config::ReplConfig;
use crate::output::state_formatter::StateFormatter;
use crate::progress::spinner::ConnectSpinner;
use crate::repl::command::ReplCommand;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;
use voiceai_application::{TextInput, VoiceSessionController};
use voiceai_domain::LlmProvider;

/// Whether the REPL keeps reading after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplAction {
    Continue,
    Exit,
}

/// Interactive voice session shell
pub struct VoiceRepl {
    controller: VoiceSessionController,
    text_input: Option<Arc<dyn TextInput>>,
    config: ReplConfig,
}

impl VoiceRepl {
    pub fn new(controller: VoiceSessionController) -> Self {
        Self {
            controller,
            text_input: None,
            config: ReplConfig::default(),
        }
    }

    /// Enable `/say` through a client that accepts typed utterances
    pub fn with_text_input(mut self, input: Arc<dyn TextInput>) -> Self {
        self.text_input = Some(input);
        self
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        if !self.config.color {
            colored::control::set_override(false);
        }

        let mut rl = DefaultEditor::new()?;

        if let Some(ref path) = self.config.history_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();
        let watcher = self.spawn_watcher();

        loop {
            match rl.readline("voice> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    if self.execute(line).await == ReplAction::Exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        watcher.abort();

        if let Some(ref path) = self.config.history_file {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    /// Print every published state change until the controller goes away.
    fn spawn_watcher(&self) -> JoinHandle<()> {
        let mut rx = self.controller.subscribe();
        tokio::spawn(async move {
            let mut previous = rx.borrow_and_update().clone();
            while rx.changed().await.is_ok() {
                let current = rx.borrow_and_update().clone();
                for line in StateFormatter::format_update(&previous, &current) {
                    println!("{}", line);
                }
                previous = current;
            }
        })
    }

    /// Parse and run one line of input.
    pub async fn execute(&self, line: &str) -> ReplAction {
        let command = match ReplCommand::parse(line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                return ReplAction::Continue;
            }
        };

        match command {
            ReplCommand::Connect(provider) => self.connect(provider).await,
            ReplCommand::Disconnect => self.controller.disconnect(),
            ReplCommand::Provider(Some(provider)) => self.controller.set_provider(provider),
            ReplCommand::Provider(None) => {
                let provider = self.controller.snapshot().llm_provider();
                println!("LLM provider: {}", provider.label().cyan());
            }
            ReplCommand::Providers => {
                println!();
                print!(
                    "{}",
                    StateFormatter::format_providers(self.controller.snapshot().llm_provider())
                );
                println!();
            }
            ReplCommand::Status => {
                println!();
                print!("{}", StateFormatter::format(&self.controller.snapshot()));
                println!();
            }
            ReplCommand::Say(text) => self.say(&text).await,
            ReplCommand::Help => Self::print_help(),
            ReplCommand::Quit => {
                println!("Bye!");
                return ReplAction::Exit;
            }
        }

        ReplAction::Continue
    }

    /// Connect with `provider`, or with the currently selected provider.
    pub async fn connect(&self, provider: Option<LlmProvider>) {
        let provider = provider.unwrap_or_else(|| self.controller.snapshot().llm_provider());
        let spinner = if self.config.show_progress {
            ConnectSpinner::start(provider)
        } else {
            ConnectSpinner::hidden()
        };

        let result = self.controller.connect(provider).await;
        spinner.finish();

        // The failure is already part of the published state
        if let Err(e) = result {
            debug!("Connect finished with error: {}", e);
        }
    }

    async fn say(&self, text: &str) {
        let Some(input) = &self.text_input else {
            println!(
                "{}",
                "Typed input needs the offline loopback client (--offline); speak into the microphone instead."
                    .yellow()
            );
            return;
        };

        if let Err(e) = input.send_text(text).await {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
    }

    fn print_welcome(&self) {
        let state = self.controller.snapshot();
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│        VoiceAI | 语音AI助手 - Voice Mode      │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Backend: {}", self.controller.config().base_url);
        println!("{}", StateFormatter::status_line(&state));
        println!();
        println!("Type /help for commands.");
        println!();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  /connect [provider]  - Start a voice session");
        println!("  /disconnect          - End the voice session");
        println!("  /provider <provider> - Select the LLM provider (doubao, glm)");
        println!("  /providers           - List LLM providers");
        println!("  /status              - Show the session state");
        println!("  /say <text>          - Speak a line as text (offline mode)");
        println!("  /help, /h, /?        - Show this help");
        println!("  /quit, /exit, /q     - Exit");
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use voiceai_application::{
        ClientConfig, ClientError, ClientOptions, EventSink, KeyValueStore, PreferenceStore,
        RealtimeClient, StorageError,
    };
    use voiceai_domain::{ConnectionStatus, SessionEvent, Transcript};

    #[derive(Default)]
    struct MapStore {
        items: Mutex<HashMap<String, String>>,
    }

    impl KeyValueStore for MapStore {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.items.lock().unwrap().get(key).cloned())
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.items
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    /// Connects on start and echoes typed text as a user transcription
    #[derive(Default)]
    struct EchoClient {
        sink: Mutex<Option<EventSink>>,
        last_options: Mutex<Option<ClientOptions>>,
    }

    #[async_trait]
    impl RealtimeClient for EchoClient {
        async fn start(&self, options: &ClientOptions, events: EventSink) -> Result<(), ClientError> {
            *self.last_options.lock().unwrap() = Some(options.clone());
            *self.sink.lock().unwrap() = Some(events.clone());
            events.connected();
            Ok(())
        }

        fn stop(&self) {
            if let Some(sink) = self.sink.lock().unwrap().take() {
                sink.disconnected();
            }
        }
    }

    #[async_trait]
    impl TextInput for EchoClient {
        async fn send_text(&self, text: &str) -> Result<(), ClientError> {
            let sink = self.sink.lock().unwrap().clone();
            match sink {
                Some(sink) => {
                    sink.emit(SessionEvent::UserTranscription(text.to_string()));
                    Ok(())
                }
                None => Err(ClientError::Connection("not connected".to_string())),
            }
        }
    }

    fn repl() -> (VoiceRepl, Arc<EchoClient>) {
        let client = Arc::new(EchoClient::default());
        let controller = VoiceSessionController::new(
            client.clone(),
            PreferenceStore::new(Arc::new(MapStore::default())),
            ClientConfig::default(),
        );
        let config = ReplConfig {
            show_progress: false,
            color: false,
            history_file: None,
        };
        let repl = VoiceRepl::new(controller)
            .with_text_input(client.clone())
            .with_config(config);
        (repl, client)
    }

    #[tokio::test]
    async fn test_connect_uses_selected_provider() {
        let (repl, client) = repl();

        assert_eq!(repl.execute("/provider glm").await, ReplAction::Continue);
        assert_eq!(repl.execute("/connect").await, ReplAction::Continue);

        let state = repl.controller.snapshot();
        assert_eq!(state.connection_status(), ConnectionStatus::Connected);
        assert_eq!(
            client.last_options.lock().unwrap().as_ref().unwrap().llm_provider,
            LlmProvider::Glm
        );
    }

    #[tokio::test]
    async fn test_connect_with_explicit_provider() {
        let (repl, _client) = repl();
        repl.execute("/connect glm").await;
        assert_eq!(repl.controller.snapshot().llm_provider(), LlmProvider::Glm);
    }

    #[tokio::test]
    async fn test_bare_text_is_spoken() {
        let (repl, _client) = repl();
        repl.execute("/connect").await;
        repl.execute("你好").await;

        assert_eq!(
            repl.controller.snapshot().transcript(),
            &Transcript::Text("你好".to_string())
        );
    }

    #[tokio::test]
    async fn test_disconnect_resets_session() {
        let (repl, _client) = repl();
        repl.execute("/connect").await;
        repl.execute("/disconnect").await;

        let state = repl.controller.snapshot();
        assert_eq!(state.connection_status(), ConnectionStatus::Disconnected);
        assert!(state.transcript().is_placeholder());
    }

    #[tokio::test]
    async fn test_say_without_text_input_leaves_state() {
        let client = Arc::new(EchoClient::default());
        let controller = VoiceSessionController::new(
            client,
            PreferenceStore::new(Arc::new(MapStore::default())),
            ClientConfig::default(),
        );
        let repl = VoiceRepl::new(controller);
        repl.execute("/connect").await;
        repl.execute("/say hello").await;

        assert!(repl.controller.snapshot().transcript().is_placeholder());
    }

    #[tokio::test]
    async fn test_quit_and_bad_input() {
        let (repl, _client) = repl();
        assert_eq!(repl.execute("/quit").await, ReplAction::Exit);
        assert_eq!(repl.execute("/connect gpt").await, ReplAction::Continue);
        assert_eq!(
            repl.controller.snapshot().connection_status(),
            ConnectionStatus::Disconnected
        );
        assert_eq!(repl.execute("/status").await, ReplAction::Continue);
    }
}
