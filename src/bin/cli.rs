//! SortedKV CLI Client
//!
//! Command-line interface for interacting with SortedKV.

use clap::{Parser, Subcommand};
use sortedkv::network::Client;

/// SortedKV CLI
#[derive(Parser, Debug)]
#[command(name = "sortedkv-cli")]
#[command(about = "CLI for the SortedKV sorted hash table server")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:6380")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Print every entry in ascending key order
    Print,

    /// Print every entry in descending key order
    PrintRev,

    /// Ping the server
    Ping,
}

fn main() {
    let args = Args::parse();

    let mut client = match Client::connect(&args.server) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Commands::Get { key } => client.get(key.as_bytes()).map(|value| match value {
            Some(value) => {
                println!("{}", String::from_utf8_lossy(&value));
                true
            }
            None => {
                eprintln!("not found");
                false
            }
        }),
        Commands::Set { key, value } => client
            .set(key.as_bytes(), value.as_bytes())
            .map(|_| {
                println!("OK");
                true
            }),
        Commands::Print => client.print().map(|text| {
            println!("{}", text);
            true
        }),
        Commands::PrintRev => client.print_reverse().map(|text| {
            println!("{}", text);
            true
        }),
        Commands::Ping => client.ping().map(|_| {
            println!("PONG");
            true
        }),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
