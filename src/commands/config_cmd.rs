use clap::{Args, Subcommand};

use super::OutputFormat;
use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Write a starter config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

const CONFIG_TEMPLATE: &str = "\
# caltrax configuration
# data_dir: /path/to/cache
# user_id: your-user-id
remote:
  url: https://your-project.supabase.co
  api_key: your-anon-key
sync:
  window_days: 30
";

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => print_config(config),
                }
                Ok(())
            }
            ConfigSubcommand::Init { force } => {
                let path = config
                    .config_file
                    .clone()
                    .unwrap_or_else(Config::default_config_path);
                if path.exists() && !force {
                    return Err(format!(
                        "Config file '{}' already exists (use --force to overwrite)",
                        path.display()
                    )
                    .into());
                }
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, CONFIG_TEMPLATE)?;
                println!("Wrote {}", path.display());
                Ok(())
            }
        }
    }
}

fn print_config(config: &Config) {
    println!("Configuration");
    println!("=============\n");

    if let Some(path) = &config.config_file {
        println!("Config file: {}", path.display());
    } else {
        println!(
            "Config file: {} (not found)",
            Config::default_config_path().display()
        );
    }
    println!();

    println!("data_dir: {}", config.data_dir.value.display());
    println!("  source: {}", config.data_dir.source);
    println!();

    match &config.user_id {
        Some(user_id) => {
            println!("user_id: {}", user_id.value);
            println!("  source: {}", user_id.source);
        }
        None => println!("user_id: (not set)"),
    }
    println!();

    if config.remote.is_configured() {
        println!("remote.url: {}", config.remote.url.as_deref().unwrap_or(""));
        println!("remote.api_key: (set)");
    } else {
        println!("remote: not configured");
    }
    println!();

    println!("sync.window_days: {}", config.sync.window_days);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_template_parses() {
        let value: serde_yaml::Value = serde_yaml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(value["sync"]["window_days"].as_u64(), Some(30));
        assert!(value["remote"]["url"].as_str().is_some());
    }
}
