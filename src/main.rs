use negachess::position::Position;
use negachess::search::{SearchOptions, DEFAULT_DEPTH};
use tracing::warn;
use tracing_subscriber::EnvFilter;

const DEPTH_VAR: &str = "NEGACHESS_DEPTH";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    println!("negachess v{}, by {}", env!("CARGO_PKG_VERSION"), env!("CARGO_PKG_AUTHORS"));

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        // Launches a perft test
        Some("perft") => {
            let depth = match args.next().map(|d| d.parse::<u32>()) {
                Some(Ok(d)) => d,
                _ => {
                    eprintln!("Expected : perft <depth>");
                    std::process::exit(2);
                }
            };
            negachess::perft_report(&mut Position::new(), depth)
        }
        _ => negachess::driver::Driver::new(search_options()).run(),
    }
}

fn search_options() -> SearchOptions {
    let mut options = SearchOptions::default();
    if let Ok(value) = std::env::var(DEPTH_VAR) {
        match value.parse::<u32>() {
            Ok(depth) => {
                options.set_depth(depth);
            }
            Err(_) => warn!(
                "ignoring {}={}, using depth {}",
                DEPTH_VAR, value, DEFAULT_DEPTH
            ),
        }
    }
    options
}
