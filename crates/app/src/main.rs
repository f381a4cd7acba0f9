// CLI modules
mod cli;

use anyhow::Context;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use cli::{
    args::{Args, Parser},
    op::{Op, OpContext},
    Callback, Init, Linked,
};

command_enum! {
    (Callback, Callback),
    (Init, Init),
    (Linked, Linked),
}

/// Install the stderr subscriber. The returned guard flushes
///  buffered log lines when dropped.
fn init_logging(log_level: &str) -> tracing_appender::non_blocking::WorkerGuard {
    let (stderr_writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let level = log_level.parse::<Level>().unwrap_or_else(|_| {
        eprintln!("Warning: unknown log level {:?}, using info", log_level);
        Level::INFO
    });
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stderr_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stderr_layer).init();

    guard
}

async fn run(args: Args) -> anyhow::Result<OpOutput> {
    let ctx = OpContext::new(args.config_path).context("failed to load config")?;

    let log_level = args
        .log_level
        .unwrap_or_else(|| ctx.config.log_level.clone());
    let _guard = init_logging(&log_level);

    Ok(args.command.execute(&ctx).await?)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    match run(args).await {
        Ok(output) => {
            println!("{}", output);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
