use clap::Parser;
use hermit::LogLevel;
use hermit::core::config::{self, CliOverrides};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "hermit", about = "Split-pane terminal chat console")]
struct Args {
    /// Nickname shown in front of your messages
    #[arg(short, long)]
    nick: Option<String>,

    /// Input and dispatcher poll interval in milliseconds
    #[arg(long = "poll-ms")]
    poll_ms: Option<u64>,

    /// Log level for hermit.log
    #[arg(long, default_value_t, value_enum)]
    log_level: LogLevel,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to hermit.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("hermit.log") {
        let _ = WriteLogger::init(LevelFilter::from(args.log_level), log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(file_config) => file_config,
        Err(e) => {
            eprintln!("hermit: {e}");
            return ExitCode::FAILURE;
        }
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            nickname: args.nick.as_deref(),
            poll_interval_ms: args.poll_ms,
        },
    );
    log::info!(
        "Hermit starting up as '{}' (poll {:?})",
        resolved.nickname,
        resolved.poll_interval
    );

    match hermit::tui::run(resolved).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::warn!("Hermit exited with error: {}", e);
            eprintln!("hermit: {e}");
            ExitCode::FAILURE
        }
    }
}
