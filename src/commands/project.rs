use anyhow::{anyhow, Result};
use clap::{Subcommand, ValueEnum};
use std::fmt::Write;

use crate::project::{EnvironmentVariable, Project, ProjectKind, ProjectNew};

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a new project and print its domain
    Create {
        #[arg(long, value_enum)]
        kind: ProjectKind,
        /// WordPress admin username (wordpress only)
        #[arg(long)]
        wp_username: Option<String>,
        /// WordPress admin password (wordpress only)
        #[arg(long)]
        wp_password: Option<String>,
        /// WordPress admin email (wordpress only)
        #[arg(long)]
        wp_email: Option<String>,
        /// Database password
        #[arg(long)]
        db_password: Option<String>,
    },
    /// List all projects
    List,
    /// Show a single project
    Show { name: String },
    /// Delete a project
    Delete { name: String },
    /// Turn autoscaling on or off
    Autoscaling {
        name: String,
        #[arg(value_enum)]
        state: Toggle,
    },
    /// Print a project's environment variables
    Env { name: String },
    /// Replace a project's environment variables
    EnvSet {
        name: String,
        /// KEY=VALUE pairs
        #[arg(required = true, value_parser = parse_env_pair)]
        vars: Vec<EnvironmentVariable>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    Enable,
    Disable,
}

pub async fn run(cmd: ProjectCommands) -> Result<()> {
    let client = super::client()?;

    match cmd {
        ProjectCommands::Create {
            kind,
            wp_username,
            wp_password,
            wp_email,
            db_password,
        } => {
            let new = project_new(kind, wp_username, wp_password, wp_email, db_password);
            let project = client.create_project(&new).await?;
            println!("{}", project.domain.unwrap_or_default());
        }
        ProjectCommands::List => {
            let projects = client.projects().await?;
            print!("{}", project_table(&projects));
        }
        ProjectCommands::Show { name } => {
            let project = client.project(&name).await?;
            print!("{}", serde_yaml::to_string(&project)?);
        }
        ProjectCommands::Delete { name } => {
            client.delete_project(&name).await?;
            println!("deleted {name}");
        }
        ProjectCommands::Autoscaling { name, state } => match state {
            Toggle::Enable => {
                client.enable_autoscaling(&name).await?;
                println!("autoscaling enabled for {name}");
            }
            Toggle::Disable => {
                client.disable_autoscaling(&name).await?;
                println!("autoscaling disabled for {name}");
            }
        },
        ProjectCommands::Env { name } => {
            for var in client.environment_variables(&name).await? {
                println!("{}={}", var.name, var.value);
            }
        }
        ProjectCommands::EnvSet { name, vars } => {
            client.set_environment_variables(&name, &vars).await?;
            println!("updated {} environment variable(s) for {name}", vars.len());
        }
    }

    Ok(())
}

fn project_new(
    kind: ProjectKind,
    wp_username: Option<String>,
    wp_password: Option<String>,
    wp_email: Option<String>,
    db_password: Option<String>,
) -> ProjectNew {
    let new = match kind {
        ProjectKind::Wordpress => ProjectNew::wordpress(
            wp_username.unwrap_or_default(),
            wp_password.unwrap_or_default(),
            wp_email.unwrap_or_default(),
        ),
        other => ProjectNew::new(other),
    };
    match db_password {
        Some(password) => new.database_password(password),
        None => new,
    }
}

fn parse_env_pair(s: &str) -> Result<EnvironmentVariable> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{s}'"))?;
    Ok(EnvironmentVariable {
        name: name.to_string(),
        value: value.to_string(),
    })
}

fn project_table(projects: &[Project]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<38}  {:<36} {}", "ID", "Name", "Kind");
    for p in projects {
        let _ = writeln!(
            out,
            "{:<38}  {:<36} {}",
            p.id.as_deref().unwrap_or("-"),
            p.name.as_deref().unwrap_or("-"),
            p.kind.as_deref().unwrap_or("-"),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wordpress_flags_fill_payload() {
        let new = project_new(
            ProjectKind::Wordpress,
            Some("admin".into()),
            Some("pw".into()),
            Some("a@example.com".into()),
            None,
        );
        assert_eq!(new, ProjectNew::wordpress("admin", "pw", "a@example.com"));
    }

    #[test]
    fn non_wordpress_ignores_wp_flags() {
        let new = project_new(
            ProjectKind::Rails,
            Some("ignored".into()),
            None,
            None,
            Some("dbpw".into()),
        );
        assert!(new.payload.is_none());
        assert_eq!(new.database.map(|d| d.password).as_deref(), Some("dbpw"));
    }

    #[test]
    fn env_pair_splits_on_first_equals() {
        let var = parse_env_pair("DATABASE_URL=mysql://u:p@h/db?x=1").unwrap();
        assert_eq!(var.name, "DATABASE_URL");
        assert_eq!(var.value, "mysql://u:p@h/db?x=1");
        assert!(parse_env_pair("NOVALUE").is_err());
    }

    #[test]
    fn table_lists_each_project() {
        let projects = vec![Project {
            id: Some("58b22c80-5c64-41ed-ac51-7ca0c695e592".into()),
            name: Some("rails-1.lolipop.io".into()),
            kind: Some("rails".into()),
            ..Project::default()
        }];
        let table = project_table(&projects);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].starts_with("58b22c80-5c64-41ed-ac51-7ca0c695e592"));
        assert!(lines[1].ends_with("rails"));
    }
}
