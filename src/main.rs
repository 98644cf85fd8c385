// src/main.rs

use cleanexec::{cli, logging, run};

fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("cleanexec: {err:?}");
    }

    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("cleanexec: {err}");
            std::process::exit(err.exit_code());
        }
    }
}
