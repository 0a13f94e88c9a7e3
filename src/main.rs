mod batch;
mod cli;
mod crypto;
mod display;
mod error;
mod export;
mod interactive;
mod source;
mod types;

fn main() {
    if let Err(e) = cli::run_cli() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
