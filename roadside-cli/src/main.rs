//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use roadside_cli::CliError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(err) = roadside_cli::run() {
        if let CliError::ArgumentParsing(parse_error) = &err {
            parse_error.exit();
        }
        report(&err);
        std::process::exit(1);
    }
}

#[expect(clippy::print_stderr, reason = "fatal errors are reported on stderr")]
fn report(err: &CliError) {
    eprintln!("roadside: {err}");
}
