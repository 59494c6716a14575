use std::env;
use std::path::PathBuf;
use std::process;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = env::args().collect();

    let path = match args.get(1).map(String::as_str) {
        Some("--help" | "-h" | "help") => {
            print_help();
            return;
        }
        Some(p) => PathBuf::from(p),
        None => PathBuf::from("."),
    };

    match relay::run(&path) {
        Ok(report) => report.summary(),
        Err(e) => {
            eprintln!("[ERROR] {e:#}");
            process::exit(1);
        }
    }
}

fn print_help() {
    println!("relay");
    println!();
    println!("USAGE:");
    println!("    relay [PATH]");
    println!();
    println!("ARGS:");
    println!("    PATH    Manifest file, or directory containing package.json (default: .)");
    println!();
    println!("Reads the manifest's \"relayReExports\" lists and writes re-export shims");
    println!("into shared/, plus an EXPORTS.md index next to the manifest.");
}
