//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;
use voiceai_domain::LlmProvider;

/// CLI arguments for voiceai
#[derive(Parser, Debug)]
#[command(name = "voiceai")]
#[command(author, version, about = "Realtime voice AI session controller")]
#[command(long_about = r#"
VoiceAI opens a realtime voice session with an RTVI backend and lets you
pick the LLM that answers (豆包 Doubao or 智谱 GLM). The provider you choose
is remembered between runs.

Configuration files are loaded from (in priority order):
1. VOICEAI_* environment variables (e.g. VOICEAI_SERVER__BASE_URL)
2. --config <path>     Explicit config file
3. ./voiceai.toml      Project-level config
4. ~/.config/voiceai/config.toml   Global config

Example:
  voiceai --connect
  voiceai --provider glm --base-url http://voice.example.com:8787
  voiceai --offline --connect
"#)]
pub struct Cli {
    /// LLM provider for this session (overrides the remembered choice)
    #[arg(short, long, value_name = "PROVIDER", value_parser = parse_provider)]
    pub provider: Option<LlmProvider>,

    /// Base URL of the voice backend
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Use the in-process loopback client instead of a backend
    #[arg(long)]
    pub offline: bool,

    /// Connect immediately on startup
    #[arg(long)]
    pub connect: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Skip config file discovery and environment overrides (an explicit --config is still read)
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

fn parse_provider(value: &str) -> Result<LlmProvider, String> {
    value.parse().map_err(|e| {
        format!(
            "{} (expected one of: {})",
            e,
            LlmProvider::ALL.map(|p| p.as_str()).join(", ")
        )
    })
}
