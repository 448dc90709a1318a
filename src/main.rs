use std::env;
use std::process;

use waves_ascension::cli;
use waves_ascension::config::AppConfig;
use waves_ascension::logging::{init_logging, DEFAULT_LOG_FILTER};

fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            init_logging(DEFAULT_LOG_FILTER);
            eprintln!("config error: {err}");
            process::exit(1);
        }
    };
    init_logging(&config.log_filter);

    let args: Vec<String> = env::args().collect();
    process::exit(cli::run_with_args(&args, &config));
}
