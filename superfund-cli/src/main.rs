//! Entry point for the `superfund` binary.
#![forbid(unsafe_code)]

use superfund_cli::CliError;

fn main() {
    init_logging();
    match superfund_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("superfund: {err}");
            std::process::exit(1);
        }
    }
}

fn init_logging() {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();
}
