use std::fmt;

use log::Level;
use serde::Serialize;

use crate::client::{Client, RequestOptions};
use crate::error::{Error, Result};

const AUTHORIZATIONS_PATH: &str = "/v1/authorizations";
const MASK_SUFFIX: &str = "***[masked]";

/// Bearer credential. Never printed in full by `Debug` or `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw value, for putting on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Token {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for Token {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({})", mask(&self.0))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&mask(&self.0))
    }
}

/// Keep the first three characters of a secret, hide the rest.
///
/// Secrets of three characters or fewer are hidden entirely.
pub fn mask(secret: &str) -> String {
    if secret.chars().count() <= 3 {
        return MASK_SUFFIX.to_string();
    }
    let head: String = secret.chars().take(3).collect();
    format!("{head}{MASK_SUFFIX}")
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

impl Client {
    /// Exchange credentials for a token and keep it for subsequent requests.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<Token> {
        if username.is_empty() {
            return Err(Error::Input("username"));
        }
        if password.is_empty() {
            return Err(Error::Input("password"));
        }

        let options =
            RequestOptions::json(&Credentials { username, password })?.redact_response();
        let token: String = self
            .http("POST", AUTHORIZATIONS_PATH, options)
            .await?
            .decode()?;

        self.emit(
            Level::Debug,
            format_args!("setting token ({})", mask(&token)),
        );
        let token = Token::new(token);
        self.set_token(token.clone());

        Ok(token)
    }
}
