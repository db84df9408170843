// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! pdpflow CLI
//!
//! Compiles network files into unit graphs and dry-runs their stages on the
//! loopback placement service.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pdpflow")]
#[command(author, version, about = "MLP dataflow graph compiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a network file and print graph statistics as JSON
    Compile {
        /// Network file (YAML)
        #[arg(value_name = "NETWORK_FILE")]
        network: PathBuf,

        /// Directory holding pdpflow.yaml (default: the network file's directory)
        #[arg(long, value_name = "DIR")]
        config: Option<PathBuf>,

        /// Include every unit and edge in the output
        #[arg(long)]
        graph: bool,
    },

    /// Build a network and run its stages on the loopback service
    Run {
        /// Network file (YAML)
        #[arg(value_name = "NETWORK_FILE")]
        network: PathBuf,

        /// Directory holding pdpflow.yaml (default: the network file's directory)
        #[arg(long, value_name = "DIR")]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the JSON output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Compile {
            network,
            config,
            graph,
        } => commands::compile::run(&network, config.as_deref(), graph),
        Commands::Run { network, config } => commands::run::run(&network, config.as_deref()),
    }
}
