//! `tessera`: interactive instruct-mode chat over a backend plugin.
//!
//! Exit status: 0 when input ends, 1 on any setup or evaluation failure,
//! 130 on ctrl-c while the user already has control (at the line editor or
//! during the initial prompt).

mod cli;
mod editor;
mod paths;
mod plugin;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::process;
use std::thread;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use editor::LineEditor;
use plugin::{PluginBackend, load_plugin_once};
use tessera_abi::backend::LLMBackend;
use tessera_core::console::ANSI_COLOR_RESET;
use tessera_core::{
    INTERRUPT_EXIT_CODE, Interaction, InterruptAction, LineInput, Session, SessionConfig,
    SessionEnd, TurnSource,
};

const ENV_LOG: &str = "TESSERA_LOG";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match run(cli) {
        Ok(SessionEnd::EndOfInput) => 0,
        Ok(SessionEnd::Interrupted) => INTERRUPT_EXIT_CODE,
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    };
    process::exit(code);
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<SessionEnd> {
    let mut cfg = cli.into_config()?;
    cfg.validate()?;

    let seed = cfg.resolve_seed();
    eprintln!("tessera: seed = {seed}");

    load_plugin_once(cfg.plugin.as_deref()).map_err(|e| anyhow!(e))?;
    let backend = PluginBackend::load(&cfg.model, &cfg.context_params())
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("failed to load model '{}'", cfg.model.display()))?;
    tracing::info!("[main] model loaded: {}", cfg.model.display());

    let cores = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    eprintln!();
    eprintln!(
        "system_info: n_threads = {} / {} | {}",
        cfg.n_threads,
        cores,
        backend.system_info().unwrap_or_default()
    );

    let stdin = io::stdin();
    if stdin.is_terminal() {
        drive(backend, &cfg, LineEditor::new()?)
    } else {
        drive(backend, &cfg, LineInput::new(stdin.lock()))
    }
}

fn drive<I: TurnSource>(backend: PluginBackend, cfg: &SessionConfig, input: I) -> Result<SessionEnd> {
    let interaction = Interaction::default();
    let mut session = Session::new(backend, cfg, interaction.clone(), input, io::stdout())?;

    install_interrupt_handler(interaction, cfg.use_color)?;
    eprint!("{}", session.banner(cfg)?);

    Ok(session.run()?)
}

/// First ctrl-c during generation returns control to the user; a ctrl-c while
/// the user already has control exits.
fn install_interrupt_handler(interaction: Interaction, use_color: bool) -> Result<()> {
    ctrlc::set_handler(move || {
        let mut out = io::stdout();
        // A pause only happens while the model generates, when the session's
        // console is already in its default colour, so this reset keeps the
        // two in step.
        if use_color {
            let _ = out.write_all(ANSI_COLOR_RESET.as_bytes());
        }
        let _ = out.write_all(b"\n");
        let _ = out.flush();

        if interaction.on_interrupt() == InterruptAction::Terminate {
            process::exit(INTERRUPT_EXIT_CODE);
        }
    })
    .context("failed to set Ctrl+C handler")
}
