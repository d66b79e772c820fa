use anyhow::Result;
use clap::Subcommand;
use clap_complete::Shell;

use crate::client::Client;
use crate::config::load_config;

pub mod completions;
pub mod login;
pub mod project;
pub mod pubkey;

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Authenticate and print the issued token as a shell export")]
    Login {
        #[arg(long)]
        username: Option<String>,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
        /// Also store the token in the config file
        #[arg(long)]
        save: bool,
    },
    #[command(about = "Create, inspect and delete projects")]
    Project {
        #[command(subcommand)]
        cmd: project::ProjectCommands,
    },
    #[command(about = "Register or remove SSH public keys")]
    Pubkey {
        #[command(subcommand)]
        cmd: pubkey::PubkeyCommands,
    },
    #[command(about = "Emit shell completion scripts")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub async fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Login {
            username,
            password,
            save,
        } => login::run(username, password, save).await,
        Commands::Project { cmd } => project::run(cmd).await,
        Commands::Pubkey { cmd } => pubkey::run(cmd).await,
        Commands::Completions { shell } => completions::run(shell),
    }
}

/// Client configured from the config file and environment.
pub(crate) fn client() -> Result<Client> {
    let config = load_config()?;
    Ok(Client::from_config(&config)?)
}
