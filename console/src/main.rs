use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use todo_console::{execute, is_yes, render, Command, Flow, HELP};
use todo_core::{Confirm, HttpFacade, InMemoryFacade, ListController, RemoteFacade};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Interactive todo list backed by the todo HTTP API or an in-memory store.
#[derive(Debug, Parser)]
#[command(name = "todo-console", version)]
struct Args {
    /// Base URL of the todo API.
    #[arg(long, env = "TODO_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Use an in-memory store instead of the HTTP API.
    #[arg(long)]
    offline: bool,

    /// Simulated latency of the in-memory store, in milliseconds.
    #[arg(long, env = "TODO_LATENCY_MS", default_value_t = 500)]
    latency_ms: u64,

    /// Start the in-memory store empty instead of with the demo items.
    #[arg(long)]
    no_seed: bool,
}

/// Asks on stdout and reads the answer from stdin.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(err) => {
                tracing::warn!(error = %err, "could not read confirmation");
                false
            }
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

fn facade(args: &Args) -> Arc<dyn RemoteFacade> {
    if args.offline {
        let store = if args.no_seed {
            InMemoryFacade::new()
        } else {
            InMemoryFacade::seeded()
        };
        tracing::info!(latency_ms = args.latency_ms, "using in-memory store");
        Arc::new(store.with_latency(Duration::from_millis(args.latency_ms)))
    } else {
        tracing::info!(base_url = %args.base_url, "using HTTP store");
        Arc::new(HttpFacade::connect(&args.base_url))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let controller = ListController::new(facade(&args), StdinConfirm);

    // Failures land in the notice shown below.
    let _ = controller.refresh().await;
    print!("{}", render(&controller.items().await, controller.notice().await.as_ref()));

    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(todo_console::ParseCommandError::Empty) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        match execute(&controller, command).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Ok(Flow::ShowHelp) => {
                println!("{HELP}");
                continue;
            }
            Err(todo_console::CommandError::Api(err)) => tracing::debug!(error = %err, "command failed"),
            Err(err) => println!("{err}"),
        }
        print!("{}", render(&controller.items().await, controller.notice().await.as_ref()));
    }
    Ok(())
}
