//! Vital-sign pipeline CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;
use vitals_cli::logging::{LogConfig, LogFormat, init_logging};
use vitals_cli::settings::load_settings;
use vitals_persistence::PersistenceError;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, RecordCommand};
use crate::commands::{
    run_assess, run_feed, run_features, run_process, run_record_add, run_record_delete,
    run_record_list,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            tracing::error!(error = %format!("{error:#}"), "command failed");
            report_error(&error);
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = load_settings(cli.config.as_deref())?;
    match &cli.command {
        Command::Process(args) => run_process(args, &settings),
        Command::Record(RecordCommand::Add(args)) => run_record_add(args, &settings),
        Command::Record(RecordCommand::List(args)) => run_record_list(args, &settings),
        Command::Record(RecordCommand::Delete(args)) => run_record_delete(args, &settings),
        Command::Feed(args) => run_feed(args, &settings),
        Command::Features(args) => run_features(args),
        Command::Assess(args) => run_assess(args, &settings),
    }
}

fn report_error(error: &anyhow::Error) {
    if let Some(persistence) = error.downcast_ref::<PersistenceError>() {
        eprintln!("error: {}", persistence.user_message());
        if let Some(hint) = persistence.suggestion() {
            eprintln!("hint: {hint}");
        }
        return;
    }
    eprintln!("error: {error:#}");
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::default()
        .with_level_filter(cli.verbosity.tracing_level_filter())
        .with_log_data(cli.log_data);
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config = config.with_format(match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    });
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
