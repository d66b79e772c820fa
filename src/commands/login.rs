use anyhow::{Context, Result};
use dialoguer::{Input, Password};

use crate::config::{config_path, load_config_file, save_config};
use crate::constants::TOKEN_ENV_VAR;

pub async fn run(username: Option<String>, password: Option<String>, save: bool) -> Result<()> {
    let username = match username {
        Some(u) => u,
        None => Input::<String>::new().with_prompt("Username").interact_text()?,
    };
    let password = match password {
        Some(p) => p,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let mut client = super::client()?;
    let token = client.login(&username, &password).await?;

    if save {
        let path = config_path();
        let mut cfg = load_config_file(&path)?;
        cfg.token = Some(token.as_str().to_string());
        save_config(&cfg, &path).context("saving token")?;
        eprintln!("Saved token to {}", path.display());
    }

    println!("export {TOKEN_ENV_VAR}={}", token.as_str());
    Ok(())
}
