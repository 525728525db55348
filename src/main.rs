use std::{io::IsTerminal, process::ExitCode};

use anyhow::Context;
use mdmc::{cli::Args, convert::Converter};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();

    let args = match Args::parse(std::env::args_os()) {
        Ok(args) => args,
        Err(usage) => {
            eprintln!("{usage}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    tracing::info!("{} -> {}", args.input.display(), args.output.display());

    let midi = std::fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let conversion = Converter::default()
        .convert(&midi)
        .with_context(|| format!("converting {}", args.input.display()))?;

    tracing::info!(
        "Duration: {} Speed: {}x",
        conversion.duration_millis(),
        conversion.playback_speed()
    );

    std::fs::write(&args.output, conversion.bytes())
        .with_context(|| format!("writing {}", args.output.display()))?;
    Ok(())
}
