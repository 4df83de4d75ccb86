use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gatews_client::{
    Channel, ChannelResult, ClientConfig, ClientError, ClientEvent, EventReceiver, Response,
    Subscription, WebSocketClient,
};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "gatews")]
#[command(about = "Stream Gate.io spot push channels as JSON lines")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// TOML file with client settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// WebSocket endpoint
    #[arg(long, env = "GATE_WS_URL")]
    base_url: Option<String>,

    /// API key for private channels
    #[arg(long, env = "GATE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API secret for private channels
    #[arg(long, env = "GATE_API_SECRET", hide_env_values = true)]
    api_secret: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream ticker updates
    Tickers {
        /// Currency pairs (e.g. BTC_USDT ETH_USDT)
        #[arg(required = true)]
        pairs: Vec<String>,
    },

    /// Stream public trades
    Trades {
        /// Currency pairs (e.g. BTC_USDT)
        #[arg(required = true)]
        pairs: Vec<String>,
    },

    /// Stream balance changes (requires API key and secret)
    Balances,

    /// Send an application ping and print the pong
    Ping,

    /// List known channels
    Channels,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (logs go to stderr, stdout carries the stream)
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    match cli.log_format {
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    let config = build_config(&cli)?;

    match cli.command {
        Commands::Tickers { pairs } => stream(config, Subscription::tickers(pairs)).await?,
        Commands::Trades { pairs } => stream(config, Subscription::trades(pairs)).await?,
        Commands::Balances => stream(config, Subscription::Balances).await?,
        Commands::Ping => ping(config).await?,
        Commands::Channels => {
            println!("Known channels:");
            for channel in Channel::ALL {
                let kind = if channel == Channel::Balances {
                    "subscribe, signed"
                } else if channel.is_subscribable() {
                    "subscribe"
                } else {
                    "control"
                };
                println!("  {:<14} {}", channel.as_str(), kind);
            }
        }
    }

    Ok(())
}

/// Config file first, then command-line / environment overrides.
fn build_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            parse_config(&raw)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => ClientConfig::default(),
    };

    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    if let Some(key) = &cli.api_key {
        config.api_key = Some(key.clone());
    }
    if let Some(secret) = &cli.api_secret {
        config.api_secret = Some(secret.clone());
    }

    Ok(config)
}

fn parse_config(raw: &str) -> Result<ClientConfig, toml::de::Error> {
    toml::from_str(raw)
}

async fn connect(config: ClientConfig) -> Result<(WebSocketClient, EventReceiver)> {
    let (mut client, events) = WebSocketClient::open(config).await?;
    client.connect().await?;
    tracing::info!(url = %client.base_url(), "Connected");
    Ok((client, events))
}

async fn stream(config: ClientConfig, subscription: Subscription) -> Result<()> {
    let (client, mut events) = connect(config).await?;

    tracing::info!(channel = %subscription.channel(), "Subscribing");
    client.subscribe(&subscription)?;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut closing = false;

    loop {
        tokio::select! {
            _ = &mut shutdown, if !closing => {
                tracing::info!("Interrupted, unsubscribing");
                closing = true;
                if let Err(e) = client.unsubscribe(&subscription) {
                    tracing::warn!(error = %e, "Unsubscribe failed");
                }
                client.close(None, None);
            }
            event = events.recv() => match event {
                Some(ClientEvent::Open) => {}
                Some(ClientEvent::Message(response)) => print_response(&response)?,
                Some(ClientEvent::Error(e @ ClientError::Transport(_))) => return Err(e.into()),
                Some(ClientEvent::Error(e)) => report(&e),
                Some(ClientEvent::Close) | None => break,
            },
        }
    }

    Ok(())
}

async fn ping(config: ClientConfig) -> Result<()> {
    let (client, mut events) = connect(config).await?;
    client.ping()?;

    while let Some(event) = events.recv().await {
        match event {
            ClientEvent::Message(response) if response.is_pong() => {
                print_response(&response)?;
                client.close(None, None);
            }
            ClientEvent::Message(_) | ClientEvent::Open => {}
            ClientEvent::Error(e @ ClientError::Transport(_)) => return Err(e.into()),
            ClientEvent::Error(e) => report(&e),
            ClientEvent::Close => break,
        }
    }

    Ok(())
}

fn report(err: &ClientError) {
    match err.as_response_error() {
        Some(server) => eprintln!("server error {}: {}", server.code(), server.message()),
        None => eprintln!("error: {}", err),
    }
}

/// Print typed updates as their payload, everything else as the full response.
fn print_response(response: &Response) -> Result<()> {
    let line = match response.channel_result() {
        ChannelResult::Tickers(ticker) => serde_json::to_string(&ticker)?,
        ChannelResult::Trades(trade) => serde_json::to_string(&trade)?,
        ChannelResult::Balances(balances) => serde_json::to_string(&balances)?,
        _ => serde_json::to_string(response)?,
    };
    println!("{}", line);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_toml() {
        let config = parse_config(
            r#"
            api_key = "key"
            api_secret = "secret"

            [transport]
            protocols = ["v4"]
            max_message_size = 1048576
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, gatews_client::DEFAULT_BASE_URL);
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.transport.protocols, vec!["v4".to_string()]);
        assert_eq!(config.transport.max_message_size, Some(1048576));
        assert!(!config.auto_connect);
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "gatews",
            "--base-url",
            "ws://127.0.0.1:9000/",
            "--api-key",
            "k",
            "--api-secret",
            "s",
            "tickers",
            "BTC_USDT",
        ])
        .unwrap();

        let config = build_config(&cli).unwrap();
        assert_eq!(config.base_url, "ws://127.0.0.1:9000/");
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.api_secret.as_deref(), Some("s"));
        assert!(matches!(cli.command, Commands::Tickers { ref pairs } if pairs == &["BTC_USDT"]));
    }

    #[test]
    fn test_tickers_requires_pairs() {
        assert!(Cli::try_parse_from(["gatews", "tickers"]).is_err());
    }
}
