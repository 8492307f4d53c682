use ccwb_cli::cli::cli;

fn main() {
    if let Err(e) = ccwb_cli::logging::setup_logging(None) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    if let Err(e) = cli() {
        ccwb_cli::cli::report_error(&e);
        std::process::exit(1);
    }
}
