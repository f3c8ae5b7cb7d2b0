use std::io::{self, Read as _};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use keygrip::{Algorithm, Keygrip};

#[derive(Parser)]
#[command(name = "keygrip", about = "Sign and verify data with rotating HMAC keys")]
struct Cli {
    /// Secret key, repeatable. The first key signs; all keys verify.
    /// Taken verbatim, so a secret may contain commas.
    #[arg(short, long = "key")]
    keys: Vec<String>,

    /// Comma-separated secrets, active first. Ignored when --key is given.
    #[arg(
        long = "keys",
        env = "KEYGRIP_KEYS",
        value_delimiter = ',',
        hide_env_values = true
    )]
    key_list: Vec<String>,

    /// MAC algorithm: "sha256" or "sha1"
    #[arg(short, long, env = "KEYGRIP_ALGORITHM", default_value = "sha256")]
    algorithm: String,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign data with the active (first) key and print the signature.
    Sign {
        /// Data to sign. If omitted, reads stdin verbatim.
        data: Option<String>,
    },

    /// Check a signature against every key. Exits non-zero if it does not verify.
    Verify {
        /// Signature as unpadded URL-safe base64.
        #[arg(short, long)]
        digest: String,

        /// Signed data. If omitted, reads stdin verbatim.
        data: Option<String>,
    },

    /// Print the position of the key that produced a signature,
    /// -1 if none did, or -2 if the signature is malformed.
    Index {
        /// Signature as unpadded URL-safe base64.
        #[arg(short, long)]
        digest: String,

        /// Signed data. If omitted, reads stdin verbatim.
        data: Option<String>,
    },

    /// Describe the configured key set as JSON, without secrets.
    Keys,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let result = build_keygrip(&cli).and_then(|kg| run(&kg, cli.command));

    match result {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

/// Build the key grip from `--key` flags, falling back to `--keys` / `KEYGRIP_KEYS`.
fn build_keygrip(cli: &Cli) -> Result<Keygrip, Box<dyn std::error::Error>> {
    let algorithm: Algorithm = cli.algorithm.parse()?;
    let keys = if cli.keys.is_empty() {
        &cli.key_list
    } else {
        &cli.keys
    };
    Ok(Keygrip::with_algorithm(keys, algorithm)?)
}

fn run(kg: &Keygrip, command: Command) -> Result<String, Box<dyn std::error::Error>> {
    match command {
        Command::Sign { data } => cmd_sign(kg, data),
        Command::Verify { digest, data } => cmd_verify(kg, &digest, data),
        Command::Index { digest, data } => cmd_index(kg, &digest, data),
        Command::Keys => cmd_keys(kg),
    }
}

fn cmd_sign(kg: &Keygrip, data: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    let data = read_data(data)?;
    Ok(kg.sign(&data)?)
}

fn cmd_verify(
    kg: &Keygrip,
    digest: &str,
    data: Option<String>,
) -> Result<String, Box<dyn std::error::Error>> {
    let data = read_data(data)?;
    if !kg.verify(&data, digest.trim()) {
        return Err("signature does not verify".into());
    }
    Ok("valid".to_string())
}

fn cmd_index(
    kg: &Keygrip,
    digest: &str,
    data: Option<String>,
) -> Result<String, Box<dyn std::error::Error>> {
    let data = read_data(data)?;
    Ok(kg.index(&data, digest.trim()).to_string())
}

fn cmd_keys(kg: &Keygrip) -> Result<String, Box<dyn std::error::Error>> {
    let output = serde_json::json!({
        "algorithm": kg.algorithm(),
        "key_count": kg.len(),
        "signature_len": kg.algorithm().encoded_len(),
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Data from the CLI argument, or all of stdin when absent.
fn read_data(data_arg: Option<String>) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    match data_arg {
        Some(s) => Ok(s.into_bytes()),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}
