//! `smart-groups` command line tool.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use sg_cli::commands::{
    GroupQuery, read_rules, run_describe, run_find_groups, run_groups_for_user, run_members,
    run_rule_types, run_schema, run_validate,
};
use sg_cli::config::{CONFIG_ENV, Config};
use sg_cli::logging::{LogConfig, LogFormat, init_logging};
use sg_cli::workspace::Workspace;
use tracing::error;
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            error!(error = format!("{err:#}"), "command failed");
            eprintln!("error: {err:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let cwd = std::env::current_dir().context("read current directory")?;
    let env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let mut config = Config::discover(cli.config.as_deref(), env, &cwd)?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(locale) = cli.locale {
        config.default_locale = locale;
    }

    let locale = config.default_locale.clone();
    let output = match cli.command {
        Command::Schema => run_schema(&Workspace::registry(&config))?,
        Command::RuleTypes => run_rule_types(&Workspace::registry(&config)),
        Command::Validate { rules } => {
            let rules = read_rules(&rules)?;
            let validation = run_validate(&Workspace::open(config)?, &rules)?;
            println!("{}", validation.render());
            return Ok(i32::from(!validation.is_valid()));
        }
        Command::Members { group_id } => run_members(&Workspace::open(config)?, &group_id)?,
        Command::GroupsForUser { user_id } => {
            run_groups_for_user(&Workspace::open(config)?, &user_id, &locale)?
        }
        Command::FindGroups(args) => {
            let query = GroupQuery {
                rule_type: args.rule_type,
                value: args.value,
                numeric: args.number,
            };
            run_find_groups(&Workspace::open(config)?, &query, &locale)?
        }
        Command::Describe { group_id } => {
            run_describe(&Workspace::open(config)?, &group_id, &locale)?
        }
    };
    println!("{output}");
    Ok(0)
}

fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
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
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
