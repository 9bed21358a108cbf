//! The `tagprune config` command for configuration management.

use clap::{Args, Subcommand};
use std::path::PathBuf;
use tagprune_core::Config;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,

    /// Show config file path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Validate a config file and the relations dataset it points at
    Check {
        /// Config file to check (defaults to the standard location)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

/// Execute the config command.
pub fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();
            init_config_file(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }

        ConfigCommand::Check { file } => {
            let path = file.unwrap_or_else(Config::default_path);
            let config = if path.exists() {
                Config::load_from(&path)?
            } else {
                tracing::warn!("No config file at {}; checking defaults", path.display());
                Config::default()
            };
            let table = config.relation_table()?;
            let source = config
                .relations_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "bundled dataset".to_string());
            println!(
                "Config OK. Relations from {}: {} edges over {} tags",
                source,
                table.len(),
                table.tag_count()
            );
        }
    }

    Ok(())
}

/// Write a default config to `path`, refusing to clobber an existing file unless `force`.
fn init_config_file(path: &std::path::Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_config_file_writes_loadable_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        init_config_file(&path, false).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.processing.parallel_workers, 4);
    }

    #[test]
    fn init_config_file_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        let err = init_config_file(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        init_config_file(&path, true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[output]"));
    }
}
