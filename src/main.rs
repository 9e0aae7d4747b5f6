// Copyright (c) 2025-2026 Revu Contributors
//
// SPDX-License-Identifier: MIT
mod cli;

use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::Cli;
use revu_core::{Agent, AgentEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = revu_config::ReviewConfig::default();
    if let Some(model) = &cli.model {
        config.model.name = model.clone();
    }
    if let Some(provider) = &cli.provider {
        config.model.provider = provider.clone();
    }
    if let Some(path) = &cli.review_file {
        config.tools.review_filename = path.clone();
    }
    let config = Arc::new(config);

    let model = revu_model::from_config(&config.model)?;
    info!(
        provider = model.name(),
        model = model.model_name(),
        dir = %cli.dir,
        "starting review"
    );

    let registry = Arc::new(revu_tools::builtin::standard_registry(
        model.clone(),
        &config.tools,
    ));
    let mut agent = Agent::new(model, registry, config);

    // Drain events concurrently so the agent never blocks on a full channel.
    let (tx, rx) = mpsc::channel(256);
    let pump = tokio::spawn(pump_events(rx));

    agent.submit(&cli.instruction(), tx).await?;

    pump.await?;
    Ok(())
}

/// Forward agent events to the terminal: model text streams to stdout,
/// everything else goes to the log on stderr.
async fn pump_events(mut rx: mpsc::Receiver<AgentEvent>) {
    let mut stdout = io::stdout();
    while let Some(ev) = rx.recv().await {
        match ev {
            AgentEvent::TextDelta(chunk) => {
                let _ = stdout.write_all(chunk.as_bytes());
                let _ = stdout.flush();
            }
            AgentEvent::TextComplete(_) => {
                let _ = stdout.write_all(b"\n");
                let _ = stdout.flush();
            }
            AgentEvent::ToolCallStarted(tc) => {
                info!(tool = %tc.name, call_id = %tc.id, "tool call started");
            }
            AgentEvent::ToolCallFinished { tool_name, call_id, is_error, output } => {
                if is_error {
                    warn!(tool = %tool_name, call_id = %call_id, "tool call failed: {output}");
                } else {
                    info!(tool = %tool_name, call_id = %call_id, "tool call finished");
                }
            }
            AgentEvent::TokenUsage { input, output } => {
                debug!(input_tokens = input, output_tokens = output, "token usage");
            }
            AgentEvent::TurnComplete => {}
            AgentEvent::Aborted { steps } => {
                eprintln!("revu: stopped after {steps} steps without a final response");
            }
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}
