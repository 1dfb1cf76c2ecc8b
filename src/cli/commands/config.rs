use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use std::fs;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            println!("📄 Current configuration:\n");
            println!("{}", serde_yaml::to_string(cfg)?);
        }

        if *check {
            if !path.exists() {
                warning(format!(
                    "No configuration file at {} (defaults in use). Run `vocamark init`.",
                    path.display()
                ));
                return Ok(());
            }

            let content = fs::read_to_string(&path)?;
            let missing = Config::missing_fields(&content)?;
            if missing.is_empty() {
                success(format!("Configuration file is complete: {}", path.display()));
            } else {
                warning(format!("Missing fields in {}:", path.display()));
                for field in &missing {
                    println!("   - {field}");
                }
                info("Missing fields fall back to their default values.");
            }
        }

        if !*print_config && !*check {
            info(format!("Config file: {}", path.display()));
        }
    }

    Ok(())
}
