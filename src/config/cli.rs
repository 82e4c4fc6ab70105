use crate::config::{Settings, TomlConfig};
use crate::presentation::OutputFormat;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "contact-directory")]
#[command(about = "Look up committee contacts by term, function and entity")]
pub struct CliConfig {
    #[arg(long, global = true, env = "DIRECTORY_BACKEND_URL")]
    pub backend_url: Option<String>,

    #[arg(long, global = true, help = "Base URL used for shareable search links")]
    pub share_base_url: Option<String>,

    #[arg(long, global = true, help = "Committee hierarchy JSON file")]
    pub committee_data: Option<String>,

    #[arg(long, global = true, help = "Function and term constants JSON file")]
    pub constants_data: Option<String>,

    #[arg(long, global = true)]
    pub cache_capacity: Option<usize>,

    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run one search and print the results
    Search(SearchArgs),
    /// List the selectable options for one field
    Options(OptionsArgs),
    /// Interactive search session
    Shell,
}

#[derive(Debug, Clone, Default, Args)]
pub struct SearchArgs {
    #[arg(long)]
    pub region: Option<String>,

    #[arg(long)]
    pub mc: Option<String>,

    #[arg(long)]
    pub lc: Option<String>,

    #[arg(long, help = "Function index")]
    pub func: Option<String>,

    #[arg(long, help = "Term index")]
    pub term: Option<String>,

    #[arg(long, help = "Query string or shared search link")]
    pub query: Option<String>,

    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Args)]
pub struct OptionsArgs {
    /// region, mc, lc, func or term
    pub field: String,

    #[arg(long)]
    pub region: Option<String>,

    #[arg(long)]
    pub mc: Option<String>,
}

impl CliConfig {
    /// 合併 `--config` 檔案後的設定
    pub fn settings(&self) -> Result<Settings> {
        let settings = Settings {
            backend_url: self.backend_url.clone(),
            share_base_url: self.share_base_url.clone(),
            committee_data: self.committee_data.clone(),
            constants_data: self.constants_data.clone(),
            cache_capacity: self.cache_capacity,
        };

        match &self.config {
            Some(path) => {
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                Ok(settings.merged_with(&file))
            }
            None => Ok(settings),
        }
    }
}
