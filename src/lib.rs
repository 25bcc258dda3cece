//! PatientSim: doctor-patient dialogue simulator.
//!
//! Generates synthetic medical interview transcripts by orchestrating two
//! LLM role-played agents (a doctor and a patient) over a unified model
//! gateway that normalizes heterogeneous text-generation backends behind one
//! call contract.
//!
//! # Quick Start
//!
//! ```no_run
//! use patientsim::config::SimConfig;
//! use patientsim::runner::BatchRunner;
//!
//! # async fn example() -> patientsim::error::Result<()> {
//! let config = SimConfig::load("config.toml")?;
//! let runner = BatchRunner::new(config)?;
//! let splits = vec!["persona".to_string()];
//! runner
//!     .run_full_simulation("gpt-4.1-api", "deepseek-api", &splits, Some(10))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod prelude;
pub mod runner;
pub mod types;
