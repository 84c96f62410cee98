use clap::{Subcommand, ValueEnum};

use crate::domain::DEFAULT_SAMPLE_LIMIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every registered system
    List {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Find systems by name or description, optionally narrowed by type, tag, or category
    Search {
        #[arg(default_value = "")]
        query: String,

        /// System type, e.g. database, rest_api, crm
        #[arg(short = 't', long = "type")]
        system_type: Option<String>,

        #[arg(long = "tag")]
        tags: Vec<String>,

        #[arg(short, long = "category")]
        categories: Vec<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the full metadata of one system
    Show {
        system_id: String,
    },

    Datasets {
        system_id: String,

        /// Only datasets whose name, description, or tags contain this text
        #[arg(short, long)]
        query: Option<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    Schema {
        system_id: String,
        dataset_id: String,
    },

    Sample {
        system_id: String,
        dataset_id: String,

        #[arg(short, long, default_value_t = DEFAULT_SAMPLE_LIMIT)]
        limit: usize,
    },

    /// Run a system-specific operation, e.g. `execute db-customer query --param table=users`
    Execute {
        system_id: String,
        operation: String,

        /// Operation parameter as key=value; values are parsed as JSON when possible
        #[arg(short, long = "param")]
        params: Vec<String>,
    },

    /// Probe every registered system
    Health {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    Stats {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}
