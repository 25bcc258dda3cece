//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// PatientSim dialogue generator
#[derive(Parser, Debug)]
#[command(name = "patientsim", version, about = "Doctor-patient dialogue simulator")]
pub struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate dialogues for one or more splits
    Generate(GenerateArgs),
    /// Test connectivity of every configured backend
    Check,
}

/// Arguments for the `generate` subcommand.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Doctor model ID
    #[arg(long, default_value = "gpt-4.1-api")]
    pub doctor_model: String,

    /// Patient model ID, or comma-separated list of IDs
    #[arg(long, default_value = "deepseek-api")]
    pub patient_model: String,

    /// Comma-separated splits to process
    #[arg(long, default_value = "persona,info")]
    pub splits: String,

    /// Limit number of profiles per split
    #[arg(long)]
    pub limit: Option<usize>,
}

impl GenerateArgs {
    pub fn patient_models(&self) -> Vec<String> {
        split_list(&self.patient_model)
    }

    pub fn split_names(&self) -> Vec<String> {
        split_list(&self.splits)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_generate_with_model_list() {
        let cli = Cli::try_parse_from([
            "patientsim",
            "generate",
            "--doctor-model",
            "gpt-4.1-api",
            "--patient-model",
            "deepseek-api, local-llama",
            "--splits",
            "valid",
            "--limit",
            "5",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.doctor_model, "gpt-4.1-api");
                assert_eq!(
                    args.patient_models(),
                    vec!["deepseek-api".to_string(), "local-llama".to_string()]
                );
                assert_eq!(args.split_names(), vec!["valid".to_string()]);
                assert_eq!(args.limit, Some(5));
            }
            other => panic!("expected Generate, got {other:?}"),
        }
    }

    #[test]
    fn parse_check_with_config_path() {
        let cli = Cli::try_parse_from(["patientsim", "check", "--config", "alt.toml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("alt.toml"));
        assert!(matches!(cli.command, Commands::Check));
    }

    #[test]
    fn generate_defaults_cover_both_splits() {
        let cli = Cli::try_parse_from(["patientsim", "generate"]).unwrap();
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(
                    args.split_names(),
                    vec!["persona".to_string(), "info".to_string()]
                );
                assert_eq!(args.limit, None);
            }
            other => panic!("expected Generate, got {other:?}"),
        }
    }
}
