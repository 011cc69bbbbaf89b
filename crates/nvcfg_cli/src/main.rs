//! nvcfg CLI
//!
//! Host-side tools for nvcfg device images.
//!
//! # Commands
//!
//! - `init` - Create an erased device image
//! - `inspect` - Display the derived layout and store state
//! - `verify` - Validate checksums and report store health
//! - `get-size` / `load` / `save` - Config operations
//! - `read-password` / `set-password` - Password hash operations

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// nvcfg command-line device image tools.
#[derive(Parser)]
#[command(name = "nvcfg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the device image file
    #[arg(global = true, short, long)]
    image: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an erased device image
    Init {
        /// Image capacity in bytes
        #[arg(short, long, default_value = "1024")]
        size: u32,
    },

    /// Display the derived layout and store state
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Validate checksums and report store health
    Verify,

    /// Print the data length of the stored config
    GetSize,

    /// Print the stored config
    Load,

    /// Store a new config
    Save {
        /// Config text (terminator-free)
        text: String,
    },

    /// Print the stored password hash as hex
    ReadPassword,

    /// Hash a password with SHA-256 and store the digest
    SetPassword {
        /// The plaintext password to hash
        password: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let image = cli.image;

    match cli.command {
        Commands::Init { size } => {
            let path = image.ok_or("Device image path required (--image)")?;
            commands::init::run(&path, size)?;
        }
        Commands::Inspect { format } => {
            let path = image.ok_or("Device image path required (--image)")?;
            commands::inspect::run(&path, &format)?;
        }
        Commands::Verify => {
            let path = image.ok_or("Device image path required (--image)")?;
            commands::verify::run(&path)?;
        }
        Commands::GetSize => {
            let path = image.ok_or("Device image path required (--image)")?;
            commands::config::get_size(&path)?;
        }
        Commands::Load => {
            let path = image.ok_or("Device image path required (--image)")?;
            commands::config::load(&path)?;
        }
        Commands::Save { text } => {
            let path = image.ok_or("Device image path required (--image)")?;
            commands::config::save(&path, &text)?;
        }
        Commands::ReadPassword => {
            let path = image.ok_or("Device image path required (--image)")?;
            commands::auth::read_password(&path)?;
        }
        Commands::SetPassword { password } => {
            let path = image.ok_or("Device image path required (--image)")?;
            commands::auth::set_password(&path, &password)?;
        }
        Commands::Version => {
            println!("nvcfg CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("nvcfg Core v{}", nvcfg_core::VERSION);
        }
    }

    Ok(())
}
