use anyhow::{Context, Result};
use clap::Parser;
use mplex::app::{build_router, seeded_store, RecordStore};
use mplex::codec::Codec;
use mplex::logging::{init_logging_with_config, LogConfig, LogFormat};
use mplex::runtime_config::{parse_stack_size, RuntimeConfig};
use mplex::server::AppService;
use std::sync::Arc;
use tracing::info;

/// In-memory key/value service built on typed handlers
#[derive(Parser, Debug)]
#[command(name = "mplex-kv", version, about, long_about = None)]
struct Cli {
    /// Address to bind (falls back to MPLEX_ADDR, then 0.0.0.0:4444)
    #[arg(long)]
    addr: Option<String>,

    /// Coroutine stack size, decimal or 0x-prefixed hex (falls back to MPLEX_STACK_SIZE)
    #[arg(long, value_parser = parse_stack_size_arg)]
    stack_size: Option<usize>,

    /// trace/debug/info/warn/error
    #[arg(long, env = "MPLEX_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// json or pretty
    #[arg(long, env = "MPLEX_LOG_FORMAT", default_value = "json")]
    log_format: String,

    /// Start with an empty store instead of the `james` record
    #[arg(long, default_value_t = false)]
    no_seed: bool,

    /// Answer GET /health before routing (shadows the `health` key)
    #[arg(long, default_value_t = false)]
    health: bool,
}

fn parse_stack_size_arg(val: &str) -> Result<usize, String> {
    parse_stack_size(val).ok_or_else(|| format!("invalid stack size: {val}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    log_config.log_level = cli.log_level.clone();
    log_config.format = LogFormat::parse(&cli.log_format);
    init_logging_with_config(&log_config)?;

    let env_config = RuntimeConfig::from_env();
    let addr = cli.addr.unwrap_or(env_config.addr);
    let stack_size = cli.stack_size.unwrap_or(env_config.stack_size);
    may::config().set_stack_size(stack_size);

    let store: Arc<RecordStore> = Arc::new(if cli.no_seed {
        RecordStore::new()
    } else {
        seeded_store()
    });
    let codec = Arc::new(Codec::json());
    let service = AppService::new(build_router(store, codec)).with_health_endpoint(cli.health);

    info!(addr = %addr, stack_size, seeded = !cli.no_seed, "Serving key/value store");
    let handle = service
        .start(addr.as_str())
        .with_context(|| format!("failed to bind {addr}"))?;
    handle.join().context("key/value listener exited")
}
