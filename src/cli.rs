use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::SynthesisBackend;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all chapters
    Chapters {
        /// Print the view model as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a chapter with its human and hybrid translations
    Chapter {
        /// Chapter number (1-114)
        number: u32,

        /// Print the view model as JSON
        #[arg(long)]
        json: bool,

        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,

        /// Override how the model is reached
        #[arg(long, value_enum)]
        backend: Option<BackendArg>,
    },

    /// Send a one-verse sample to the model and print its raw reply
    Probe {
        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,

        /// Override how the model is reached
        #[arg(long, value_enum)]
        backend: Option<BackendArg>,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Output path
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Commands {
    /// Whether the command reads the configuration file.
    ///
    /// `init-config` must work even when the existing file is broken.
    pub fn uses_config(&self) -> bool {
        !matches!(self, Commands::InitConfig { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    /// Pipe the prompt into the runner binary
    Cli,
    /// Use the runner's REST endpoint
    Api,
}

impl From<BackendArg> for SynthesisBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Cli => SynthesisBackend::Cli,
            BackendArg::Api => SynthesisBackend::Api,
        }
    }
}
