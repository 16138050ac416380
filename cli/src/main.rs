//! CLI entrypoint for VoiceAI
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use voiceai_application::{
    ClientConfig, KeyValueStore, NoSessionJournal, PreferenceStore, RealtimeClient,
    SessionJournal, TextInput, VoiceSessionController,
};
use voiceai_infrastructure::{
    ConfigLoader, FileConfig, FileLoggingConfig, JsonFileStore, JsonlSessionJournal,
    LoopbackClient, MemoryStore, Severity,
};
use voiceai_presentation::{Cli, ReplConfig, VoiceRepl};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    // === Configuration ===
    let loaded = match (&cli.config, cli.no_config) {
        (Some(path), true) => ConfigLoader::load_file(path),
        (None, true) => Ok(ConfigLoader::load_defaults()),
        (explicit, false) => ConfigLoader::load(explicit.as_ref()),
    };
    let mut config = loaded.map_err(|e| anyhow!("Failed to load configuration: {}", e))?;
    if let Some(base_url) = &cli.base_url {
        config.server.base_url = base_url.clone();
    }

    let _log_guard = init_tracing(cli.verbose, &config.logging)?;

    info!("Starting VoiceAI");

    for issue in config.validate() {
        match issue.severity {
            // The loopback client never dials the backend
            Severity::Error if !cli.offline => bail!("Invalid configuration: {}", issue.message),
            Severity::Error | Severity::Warning => warn!("{}", issue.message),
        }
    }

    // === Dependency Injection ===
    let preferences = PreferenceStore::new(preference_storage(&config));
    let journal = session_journal(&config);
    let client_config = config.server.to_client_config();

    let (client, text_input): (Arc<dyn RealtimeClient>, Option<Arc<dyn TextInput>>) =
        if cli.offline {
            info!("Offline mode: using the loopback client");
            let loopback = Arc::new(LoopbackClient::new(
                config.loopback.connect_delay(),
                config.loopback.reply_delay(),
            ));
            let input: Arc<dyn TextInput> = loopback.clone();
            let client: Arc<dyn RealtimeClient> = loopback;
            (client, Some(input))
        } else {
            (online_client(&client_config)?, None)
        };

    let controller =
        VoiceSessionController::with_journal(client, preferences, client_config, journal);

    if let Some(provider) = cli.provider {
        controller.set_provider(provider);
    }

    let repl_config = ReplConfig {
        show_progress: config.repl.show_progress && !cli.quiet,
        color: config.repl.color,
        history_file: config.repl.resolved_history_file(),
    };
    let mut repl = VoiceRepl::new(controller.clone()).with_config(repl_config);
    if let Some(input) = text_input {
        repl = repl.with_text_input(input);
    }

    if cli.connect {
        repl.connect(None).await;
    }

    let outcome = repl.run().await;
    controller.teardown();
    outcome?;

    Ok(())
}

/// Install the tracing subscriber.
///
/// The filter comes from `RUST_LOG`, then `-v`, then `[logging] level`.
/// The returned guard flushes the log file on drop.
fn init_tracing(verbose: u8, logging: &FileLoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => logging
                .level
                .as_deref()
                .and_then(|level| EnvFilter::try_new(level).ok())
                .unwrap_or_else(|| EnvFilter::new("warn")),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"), // -vvv or more
        },
    };

    let (file_layer, guard) = match logging.resolved_file() {
        Some(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("logging.file has no file name: {}", path.display()))?
                .to_owned();
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| ".".into());
            std::fs::create_dir_all(&dir)?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

fn preference_storage(config: &FileConfig) -> Arc<dyn KeyValueStore> {
    match config.storage.resolved_path() {
        Some(path) => {
            info!(path = %path.display(), "Using preference storage");
            Arc::new(JsonFileStore::new(path))
        }
        None => {
            warn!("No data directory available; the provider choice will not be remembered");
            Arc::new(MemoryStore::new())
        }
    }
}

fn session_journal(config: &FileConfig) -> Arc<dyn SessionJournal> {
    if !config.journal.enabled {
        return Arc::new(NoSessionJournal);
    }

    match config
        .journal
        .resolved_path()
        .and_then(JsonlSessionJournal::new)
    {
        Some(journal) => {
            info!(path = %journal.path().display(), "Recording session journal");
            Arc::new(journal)
        }
        None => {
            warn!("Session journal disabled: no usable journal path");
            Arc::new(NoSessionJournal)
        }
    }
}

#[cfg(feature = "rtvi-http")]
fn online_client(config: &ClientConfig) -> Result<Arc<dyn RealtimeClient>> {
    Ok(Arc::new(voiceai_infrastructure::RtviHttpClient::new(
        config.connect_timeout,
    )?))
}

#[cfg(not(feature = "rtvi-http"))]
fn online_client(_config: &ClientConfig) -> Result<Arc<dyn RealtimeClient>> {
    bail!("Built without the rtvi-http feature; run with --offline")
}
