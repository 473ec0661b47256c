//! CLI argument definitions for `smart-groups`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "smart-groups",
    version,
    about = "Evaluate rule-based smart groups over a user dataset",
    long_about = "Evaluate rule-based smart groups over a user dataset.\n\n\
                  Generates the JSON schema for rule lists, validates rules, \
                  lists group members and finds the groups a user belongs to."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: $SMART_GROUPS_CONFIG or ./smart-groups.toml).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Dataset directory (overrides data_dir from the configuration).
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Locale for descriptions and titles (overrides default_locale).
    #[arg(long, value_name = "LOCALE", global = true)]
    pub locale: Option<String>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the JSON schema for rule lists.
    Schema,

    /// List the registered rule types and their predicates.
    RuleTypes,

    /// Validate a JSON file holding a rule list.
    Validate {
        #[arg(value_name = "RULES_JSON")]
        rules: PathBuf,
    },

    /// List the members of a smart group.
    Members {
        #[arg(value_name = "GROUP_ID")]
        group_id: String,
    },

    /// List the smart groups a user belongs to.
    GroupsForUser {
        #[arg(value_name = "USER_ID")]
        user_id: String,
    },

    /// Find smart groups by the rules they contain.
    FindGroups(FindGroupsArgs),

    /// Describe every rule of a smart group.
    Describe {
        #[arg(value_name = "GROUP_ID")]
        group_id: String,
    },
}

#[derive(Args)]
#[group(required = true, multiple = true)]
pub struct FindGroupsArgs {
    /// Groups with a rule of this type.
    #[arg(long = "rule-type", value_name = "TAG")]
    pub rule_type: Option<String>,

    /// Groups with a rule holding this value.
    #[arg(long, value_name = "VALUE")]
    pub value: Option<String>,

    /// Read `--value` as a number, for numeric custom field rules.
    #[arg(long, requires = "value")]
    pub number: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
