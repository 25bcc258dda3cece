//! patientsim binary entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use patientsim::cli::{Cli, Commands};
use patientsim::config::SimConfig;
use patientsim::error::Result;
use patientsim::runner::BatchRunner;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "patientsim=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = SimConfig::load(&cli.config)?;
    let runner = BatchRunner::new(config)?;

    match cli.command {
        Commands::Check => {
            for (model_id, ok) in runner.check_connections().await {
                if ok {
                    println!("✓ {model_id}");
                } else {
                    println!("✗ {model_id}");
                }
            }
        }
        Commands::Generate(args) => {
            let patient_models = args.patient_models();
            let splits = args.split_names();

            if let [patient_model] = patient_models.as_slice() {
                runner
                    .run_full_simulation(&args.doctor_model, patient_model, &splits, args.limit)
                    .await?;
            } else {
                runner
                    .run_multi_model_simulation(
                        &args.doctor_model,
                        &patient_models,
                        &splits,
                        args.limit,
                    )
                    .await?;
            }
        }
    }

    Ok(())
}
