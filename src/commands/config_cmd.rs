use clap::{Args, Subcommand};

use super::OutputFormat;
use crate::config::{Config, ConfigSource};

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values and where each came from
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// `(key, value, source)` for each setting, in display order.
fn settings(config: &Config) -> Vec<(&'static str, String, &ConfigSource)> {
    vec![
        (
            "database_path",
            config.database_path.value.display().to_string(),
            &config.database_path.source,
        ),
        (
            "username",
            config
                .username
                .value
                .clone()
                .unwrap_or_else(|| "(not set)".to_string()),
            &config.username.source,
        ),
    ]
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let ConfigSubcommand::Show { format } = &self.command;

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(config)?);
            }
            OutputFormat::Text => {
                match &config.config_file {
                    Some(path) => println!("Config file: {}", path.display()),
                    None => println!(
                        "Config file: {} (not found)",
                        Config::default_config_path().display()
                    ),
                }
                println!();

                println!("{:<15}  {:<12}  VALUE", "KEY", "SOURCE");
                println!("{}", "-".repeat(80));
                for (key, value, source) in settings(config) {
                    println!("{:<15}  {:<12}  {}", key, source.to_string(), value);
                }
            }
        }
        Ok(())
    }
}
