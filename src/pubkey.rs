use serde::{Deserialize, Serialize};

use crate::client::{path_segment, Client, RequestOptions};
use crate::error::{Error, Result};

const PUBKEYS_PATH: &str = "/v1/pubkeys";

/// An OpenSSH public key registered for SSH access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub key: String,
}

impl PublicKey {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }
}

impl Client {
    pub async fn add_public_key(&self, public_key: &PublicKey) -> Result<PublicKey> {
        if public_key.name.is_empty() {
            return Err(Error::Input("name"));
        }
        if public_key.key.is_empty() {
            return Err(Error::Input("key"));
        }

        let options = RequestOptions::json(public_key)?;
        self.http("POST", PUBKEYS_PATH, options).await?.decode()
    }

    pub async fn delete_public_key(&self, name: &str) -> Result<()> {
        let path = format!("{PUBKEYS_PATH}/{}", path_segment(name)?);
        self.http("DELETE", &path, RequestOptions::new()).await?;
        Ok(())
    }
}
