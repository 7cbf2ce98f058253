use std::io::Write;
use std::process::ExitCode;
use clap::Parser;
use env_logger::fmt::Formatter;
use log::{Level, LevelFilter, Record};
use homeview::config::Config;

#[derive(Parser)]
struct CliArgs {

    /// Path to the config.toml file
    config_file: std::path::PathBuf,

    /// Log level of the homeview modules (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn env_logger_format(buf: &mut Formatter, record: &Record<'_>) -> std::io::Result<()> {
    let color: &'static str = match record.level() {
        Level::Error => "\x1b[91m",
        Level::Warn => "\x1b[93m",
        Level::Info => "\x1b[97m",
        Level::Debug => "\x1b[35m",
        Level::Trace => "\x1b[37m",
    };
    writeln!(buf, "\x1b[37m{} {}{} \x1b[3;37m{}:{} {}{}\x1b[0m",
             chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
             color,
             record.level(),
             record.module_path().unwrap_or("unknown"),
             record.line().unwrap_or(0),
             color,
             record.args())?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli_args = CliArgs::parse();

    // initialize logging
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module("homeview_lib", cli_args.log_level)
        .filter_module("homeview", cli_args.log_level)
        .format(env_logger_format)
        .init();

    // load config
    let config = match Config::from_file(&cli_args.config_file) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // run until shutdown
    match homeview::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
