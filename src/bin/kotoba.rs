//! Command-line interface for kotoba
//! This binary inspects source files by dumping or checking their token
//! streams.
//!
//! Usage:
//!   kotoba tokens `<path>` [--format `<format>`]  - Print the token stream
//!   kotoba check `<path>`                       - Tokenize and report errors only

use clap::{Arg, Command};

use kotoba::kotoba::processor::{self, OutputFormat};

fn main() {
    let matches = Command::new("kotoba")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting kotoba token streams")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("tokens")
                .about("Tokenize a file and print the token stream")
                .arg(
                    Arg::new("path")
                        .help("Path to the source file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('text', 'json', 'yaml')")
                        .default_value("text"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Tokenize a file, reporting only errors")
                .arg(
                    Arg::new("path")
                        .help("Path to the source file")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("tokens", tokens_matches)) => {
            let path = tokens_matches.get_one::<String>("path").unwrap();
            let format = tokens_matches.get_one::<String>("format").unwrap();
            handle_tokens_command(path, format);
        }
        Some(("check", check_matches)) => {
            let path = check_matches.get_one::<String>("path").unwrap();
            handle_check_command(path);
        }
        _ => unreachable!(),
    }
}

/// Handle the tokens command
fn handle_tokens_command(path: &str, format: &str) {
    let format = format.parse::<OutputFormat>().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let output = processor::process_file(path, format).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    print!("{}", output);
}

/// Handle the check command
fn handle_check_command(path: &str) {
    match processor::process_file(path, OutputFormat::Text) {
        Ok(_) => println!("OK"),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
