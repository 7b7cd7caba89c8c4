// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use the_dagstream::config::consts::{DEFAULT_CONFIG_FILE, DEFAULT_LOG_FILTER};
use the_dagstream::config::{load_config_or_packaged, PipelineRuntime, PluginRegistry};
use the_dagstream::engine::RunReport;
use the_dagstream::traits::JsonLinesObserver;

#[derive(Parser)]
#[command(
    name = "the-dagstream",
    about = "Compile a DAG job description into a stream pipeline and run it"
)]
struct Cli {
    /// Job description (.json, .yaml or .yml). Packaged configs are used when
    /// no such file exists.
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Validate and compile the graph without running it
    #[arg(long, default_value_t = false)]
    check: bool,

    /// Print every result item to stdout as a JSON line
    #[arg(long, default_value_t = false)]
    print: bool,

    /// List the registered plugins and exit
    #[arg(long, default_value_t = false)]
    list_plugins: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let registry = PluginRegistry::with_builtins();

    if cli.list_plugins {
        for name in registry.names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let config = load_config_or_packaged(&cli.config)
        .with_context(|| format!("Loading '{}'", cli.config.display()))?;
    let pipeline = PipelineRuntime::from_config(config)?;

    if cli.check {
        if let Err(errors) = pipeline.check(&registry) {
            for error in &errors {
                eprintln!("{}", error);
            }
            bail!("{} node(s) failed to compile", errors.len());
        }
        println!(
            "'{}' compiles: {} nodes",
            pipeline.graph().process().name,
            pipeline.graph().len()
        );
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(pipeline.options().worker_threads())
        .enable_all()
        .build()
        .context("Building the tokio runtime")?;

    let report = runtime.block_on(run(&pipeline, &registry, cli.print))?;
    tracing::info!(
        items = report.items,
        failures = report.failures.len(),
        cancelled = report.cancelled,
        duration_ms = report.duration.as_millis() as u64,
        "Run finished"
    );
    Ok(())
}

async fn run(
    pipeline: &PipelineRuntime,
    registry: &PluginRegistry,
    print: bool,
) -> anyhow::Result<RunReport> {
    let mut controller = pipeline.controller();
    if print {
        controller = controller.with_observer(JsonLinesObserver);
    }

    let token = controller.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    Ok(pipeline.run_with(registry, controller).await?)
}
