use anyhow::{Context, Result};
use clap::{ArgGroup, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use crate::pubkey::PublicKey;

#[derive(Subcommand, Debug)]
pub enum PubkeyCommands {
    /// Register an OpenSSH public key
    #[command(group(ArgGroup::new("material").required(true).args(["key", "key_file"])))]
    Add {
        #[arg(long)]
        name: String,
        /// Key material, e.g. "ssh-ed25519 AAAA... user@host"
        #[arg(long)]
        key: Option<String>,
        /// Read the key from a file such as ~/.ssh/id_ed25519.pub
        #[arg(long)]
        key_file: Option<PathBuf>,
    },
    /// Remove a registered public key
    Delete { name: String },
}

pub async fn run(cmd: PubkeyCommands) -> Result<()> {
    let client = super::client()?;

    match cmd {
        PubkeyCommands::Add {
            name,
            key,
            key_file,
        } => {
            let key = match (key, key_file) {
                (Some(key), _) => key,
                (None, Some(path)) => read_key_file(&path)?,
                (None, None) => String::new(),
            };
            let added = client.add_public_key(&PublicKey::new(name, key)).await?;
            println!("added public key {}", added.name);
        }
        PubkeyCommands::Delete { name } => {
            client.delete_public_key(&name).await?;
            println!("deleted public key {name}");
        }
    }

    Ok(())
}

fn read_key_file(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading public key {}", path.display()))?;
    Ok(raw.trim().to_string())
}
