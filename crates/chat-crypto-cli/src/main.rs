use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chat_crypto::{
    can_decrypt, compute_integrity_hash, decrypt, encrypt, ConversationCrypto, CryptoConfig,
    Participants,
};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(name = "chat-crypto")]
#[command(about = "Operator tool for counseling chat encryption", long_about = None)]
struct Cli {
    /// JSON config file with `server_secret`; defaults to the SERVER_SECRET env var
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Either an explicit key or the two participants to derive it from.
#[derive(Args)]
struct KeySource {
    /// Raw key string
    #[arg(long, conflicts_with_all = ["patient", "counselor"])]
    key: Option<String>,

    /// Patient id (requires --counselor)
    #[arg(long, requires = "counselor")]
    patient: Option<String>,

    /// Counselor id (requires --patient)
    #[arg(long, requires = "patient")]
    counselor: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the conversation key for a patient/counselor pair
    DeriveKey {
        patient_id: String,
        counselor_id: String,
    },

    /// Encrypt a message
    Encrypt {
        #[command(flatten)]
        key: KeySource,
        plaintext: String,
    },

    /// Decrypt a message envelope
    Decrypt {
        #[command(flatten)]
        key: KeySource,
        ciphertext: String,
    },

    /// Print whether an envelope decrypts under the key
    Probe {
        #[command(flatten)]
        key: KeySource,
        ciphertext: String,
    },

    /// Compute the integrity hash of a message
    Hash {
        content: String,
        sender_id: String,
        timestamp: String,
    },

    /// Seal a message as it would be stored and print the JSON document
    Seal {
        #[arg(long)]
        patient: String,
        #[arg(long)]
        counselor: String,
        #[arg(long)]
        sender: String,
        /// RFC 3339 send time; defaults to now
        #[arg(long)]
        sent_at: Option<String>,
        plaintext: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_crypto=info,chat_crypto_cli=info".into()),
        )
        .init();

    run(Cli::parse())
}

fn load_service(config: Option<&PathBuf>) -> Result<ConversationCrypto> {
    let cfg = CryptoConfig::load(config.map(PathBuf::as_path))
        .context("loading server secret")?;
    info!("server secret loaded");
    Ok(ConversationCrypto::from_config(&cfg))
}

fn resolve_key(source: KeySource, config: Option<&PathBuf>) -> Result<String> {
    match source {
        KeySource { key: Some(k), .. } => Ok(k),
        KeySource {
            patient: Some(p),
            counselor: Some(c),
            ..
        } => {
            let svc = load_service(config)?;
            let key = svc.derive_conversation_key(&p, &c)?;
            Ok(key.as_str().to_string())
        }
        _ => Err(anyhow!("either --key or --patient and --counselor is required")),
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.config.as_ref();
    match cli.command {
        Commands::DeriveKey {
            patient_id,
            counselor_id,
        } => {
            let svc = load_service(config)?;
            let key = svc.derive_conversation_key(&patient_id, &counselor_id)?;
            println!("{}", key.as_str());
        }
        Commands::Encrypt { key, plaintext } => {
            let key = resolve_key(key, config)?;
            println!("{}", encrypt(&plaintext, &key)?);
        }
        Commands::Decrypt { key, ciphertext } => {
            let key = resolve_key(key, config)?;
            let plaintext = decrypt(&ciphertext, &key)
                .map_err(|e| anyhow!("{}: {e}", e.kind()))?;
            println!("{plaintext}");
        }
        Commands::Probe { key, ciphertext } => {
            let key = resolve_key(key, config)?;
            println!("{}", can_decrypt(&ciphertext, &key));
        }
        Commands::Hash {
            content,
            sender_id,
            timestamp,
        } => {
            println!("{}", compute_integrity_hash(&content, &sender_id, &timestamp));
        }
        Commands::Seal {
            patient,
            counselor,
            sender,
            sent_at,
            plaintext,
        } => {
            let sent_at = match sent_at {
                Some(ts) => DateTime::parse_from_rfc3339(&ts)
                    .with_context(|| format!("invalid --sent-at {ts:?}"))?
                    .with_timezone(&Utc),
                None => Utc::now(),
            };
            let svc = load_service(config)?;
            let parts = Participants::new(patient, counselor);
            let stored = svc.seal_message(&parts, &sender, &plaintext, sent_at)?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
    }
    Ok(())
}
