use std::env;
use std::process::ExitCode;

use artian::cli;
use artian::config::AppConfig;
use artian::logging::init_tracing;

fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return ExitCode::from(1);
        }
    };
    init_tracing(&config.log_filter);

    let args: Vec<String> = env::args().collect();
    let code = cli::run_with_args(&args, &config);
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
