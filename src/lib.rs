//! # lolp
//!
//! Client library and CLI for the Lolipop! Managed Cloud REST API.
//!
//! ```no_run
//! # async fn demo() -> lolp::Result<()> {
//! let mut client = lolp::Client::new("https://api.mc.lolipop.jp/")?;
//! client.login("user", "password").await?;
//! for project in client.projects().await? {
//!     println!("{:?}", project.name);
//! }
//! # Ok(())
//! # }
//! ```

use clap::Parser;

pub mod auth;
pub mod client;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod logger;
pub mod project;
pub mod pubkey;
pub mod response;

pub use auth::{mask, Token};
pub use client::{Client, RequestOptions};
pub use config::Config;
pub use error::{Error, Result, ServerErrors};
pub use project::{
    Database, DatabaseCredentials, EnvironmentVariable, Project, ProjectKind, ProjectNew, Ssh,
    WordpressPayload,
};
pub use pubkey::PublicKey;
pub use response::BufferedResponse;

/// Command-line client for Lolipop! Managed Cloud
#[derive(Parser)]
#[command(
    name = "lolp",
    version,
    about = "Command-line client for Lolipop! Managed Cloud",
    long_about = "Manage Lolipop! Managed Cloud projects and SSH public keys from the command line.\n\nThe endpoint, token and TLS settings are read from the config file and the\nLOLP_ENDPOINT, LOLP_TOKEN and LOLP_TLS_NOVERIFY environment variables."
)]
pub struct Cli {
    /// Log level written to stderr
    #[arg(short = 'l', long = "loglevel", value_enum, default_value_t, global = true)]
    pub loglevel: logger::LogLevel,

    #[command(subcommand)]
    pub cmd: Option<commands::Commands>,
}
