//! Project lifecycle: create, list, show, delete, autoscaling and
//! environment variables.
//!
//! Creation payloads are built through per-kind constructors on
//! [`ProjectNew`], so a malformed request is a type error rather than a
//! runtime field-lookup failure.

use std::fmt;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use log::Level;
use serde::{Deserialize, Deserializer, Serialize};

use crate::client::{path_segment, Client, RequestOptions};
use crate::error::{Error, Result};

const PROJECTS_PATH: &str = "/v1/projects";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Wordpress,
    Php,
    Rails,
    Node,
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProjectKind::Wordpress => "wordpress",
            ProjectKind::Php => "php",
            ProjectKind::Rails => "rails",
            ProjectKind::Node => "node",
        };
        f.write_str(name)
    }
}

/// Initial WordPress administrator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordpressPayload {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseCredentials {
    pub password: String,
}

/// Request body for creating a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectNew {
    pub kind: ProjectKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<WordpressPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseCredentials>,
}

impl ProjectNew {
    pub fn new(kind: ProjectKind) -> Self {
        Self {
            kind,
            payload: None,
            database: None,
        }
    }

    pub fn wordpress(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            payload: Some(WordpressPayload {
                username: username.into(),
                password: password.into(),
                email: email.into(),
            }),
            ..Self::new(ProjectKind::Wordpress)
        }
    }

    pub fn database_password(mut self, password: impl Into<String>) -> Self {
        self.database = Some(DatabaseCredentials {
            password: password.into(),
        });
        self
    }

    fn validate(&self) -> Result<()> {
        if self.kind == ProjectKind::Wordpress {
            let payload = self.payload.as_ref().ok_or(Error::Input("payload"))?;
            if payload.username.is_empty() {
                return Err(Error::Input("payload username"));
            }
            if payload.password.is_empty() {
                return Err(Error::Input("payload password"));
            }
            if payload.email.is_empty() {
                return Err(Error::Input("payload email"));
            }
        }
        if let Some(database) = &self.database {
            if database.password.is_empty() {
                return Err(Error::Input("database password"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub host: Option<String>,
    pub name: Option<String>,
    pub user: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ssh {
    pub user: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// A project as returned by the API. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(
        rename = "userID",
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_domains: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<Database>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh: Option<Ssh>,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub name: String,
    pub value: String,
}

/// Older API revisions send numeric identifiers.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    }))
}

fn project_path(name: &str) -> Result<String> {
    Ok(format!("{PROJECTS_PATH}/{}", path_segment(name)?))
}

impl Client {
    pub async fn create_project(&self, new: &ProjectNew) -> Result<Project> {
        new.validate()?;
        self.emit(
            Level::Info,
            format_args!("creating project (kind: {})", new.kind),
        );
        let options = RequestOptions::json(new)?;
        self.http("POST", PROJECTS_PATH, options).await?.decode()
    }

    pub async fn projects(&self) -> Result<Vec<Project>> {
        self.http("GET", PROJECTS_PATH, RequestOptions::new())
            .await?
            .decode()
    }

    pub async fn project(&self, name: &str) -> Result<Project> {
        let path = project_path(name)?;
        self.http("GET", &path, RequestOptions::new())
            .await?
            .decode()
    }

    pub async fn delete_project(&self, name: &str) -> Result<()> {
        let path = project_path(name)?;
        self.http("DELETE", &path, RequestOptions::new()).await?;
        Ok(())
    }

    pub async fn enable_autoscaling(&self, name: &str) -> Result<()> {
        self.set_autoscaling(name, true).await
    }

    pub async fn disable_autoscaling(&self, name: &str) -> Result<()> {
        self.set_autoscaling(name, false).await
    }

    async fn set_autoscaling(&self, name: &str, enabled: bool) -> Result<()> {
        let action = if enabled { "enable" } else { "disable" };
        let path = format!("{}/autoscaling/{action}", project_path(name)?);
        self.http("PUT", &path, RequestOptions::new()).await?;
        Ok(())
    }

    pub async fn environment_variables(&self, name: &str) -> Result<Vec<EnvironmentVariable>> {
        let path = format!("{}/environment-variables", project_path(name)?);
        self.http("GET", &path, RequestOptions::new())
            .await?
            .decode()
    }

    /// Replace the project's environment variables with `variables`.
    pub async fn set_environment_variables(
        &self,
        name: &str,
        variables: &[EnvironmentVariable],
    ) -> Result<()> {
        let path = format!("{}/environment-variables", project_path(name)?);
        if variables.iter().any(|v| v.name.is_empty()) {
            return Err(Error::Input("environment variable name"));
        }
        let options = RequestOptions::json(variables)?;
        self.http("PUT", &path, options).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wordpress_request_serializes_payload() {
        let new = ProjectNew::wordpress("u", "p", "e");
        let json = serde_json::to_string(&new).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"wordpress","payload":{"username":"u","password":"p","email":"e"}}"#
        );
    }

    #[test]
    fn rails_request_serializes_database() {
        let new = ProjectNew::new(ProjectKind::Rails).database_password("Secret#Gopher123?");
        let json = serde_json::to_value(&new).unwrap();
        assert_eq!(json["kind"], "rails");
        assert_eq!(json["database"]["password"], "Secret#Gopher123?");
        assert!(json.get("payload").is_none());
    }

    #[test]
    fn project_new_survives_echo() {
        let new = ProjectNew::wordpress("u", "p", "e");
        let echoed: ProjectNew =
            serde_json::from_slice(&serde_json::to_vec(&new).unwrap()).unwrap();
        assert_eq!(echoed, new);
    }

    #[test]
    fn wordpress_without_payload_is_rejected() {
        let err = ProjectNew::new(ProjectKind::Wordpress)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Input("payload")));

        let err = ProjectNew::wordpress("u", "", "e").validate().unwrap_err();
        assert!(matches!(err, Error::Input("payload password")));
    }

    #[test]
    fn empty_database_password_is_rejected() {
        let err = ProjectNew::new(ProjectKind::Php)
            .database_password("")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Input("database password")));
    }

    #[test]
    fn project_tolerates_missing_fields() {
        let project: Project = serde_json::from_str("{}").unwrap();
        assert_eq!(project, Project::default());
    }

    #[test]
    fn numeric_ids_are_stringified() {
        let project: Project = serde_json::from_str(r#"{"id":42,"userID":7}"#).unwrap();
        assert_eq!(project.id.as_deref(), Some("42"));
        assert_eq!(project.user_id.as_deref(), Some("7"));
    }

    #[test]
    fn kind_display_matches_wire_name() {
        for kind in [
            ProjectKind::Wordpress,
            ProjectKind::Php,
            ProjectKind::Rails,
            ProjectKind::Node,
        ] {
            let wire = serde_json::to_value(kind).unwrap();
            assert_eq!(wire, kind.to_string());
        }
    }

    #[test]
    fn empty_name_has_no_path() {
        assert!(matches!(project_path(""), Err(Error::Input("name"))));
        assert_eq!(project_path("rails-1").unwrap(), "/v1/projects/rails-1");
        assert_eq!(project_path("a/b").unwrap(), "/v1/projects/a%2Fb");
    }
}
