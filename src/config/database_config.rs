use serde::{Deserialize, Serialize};

/// Configuration for the database connection.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Name of the database to connect to.
    pub name: String,
    /// Hostname to use to connect to the database.
    pub host: String,
    /// Port to use to connect to the database.
    pub port: u16,
    /// Username to use to connect to the database.
    pub username: String,
    /// Optional password to use to connect to the database.
    pub password: Option<String>,
    /// Defines a maximum number of connections allowed.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            name: "flowgrid".to_string(),
            host: "localhost".to_string(),
            port: 5432,
            username: "postgres".to_string(),
            password: None,
            max_connections: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::DatabaseConfig;
    use insta::assert_toml_snapshot;

    #[test]
    fn serialization_and_default() {
        assert_toml_snapshot!(DatabaseConfig::default(), @r###"
        name = 'flowgrid'
        host = 'localhost'
        port = 5432
        username = 'postgres'
        max_connections = 10
        "###);

        let config = DatabaseConfig {
            password: Some("password".to_string()),
            max_connections: 50,
            ..Default::default()
        };
        assert_toml_snapshot!(config, @r###"
        name = 'flowgrid'
        host = 'localhost'
        port = 5432
        username = 'postgres'
        password = 'password'
        max_connections = 50
        "###);
    }

    #[test]
    fn deserialization() -> anyhow::Result<()> {
        let config: DatabaseConfig = toml::from_str(
            r#"
        name = 'tasks'
        username = 'flowgrid'
        password = 'password'
        host = 'db.flowgrid.dev'
        port = 6432
        max_connections = 20
    "#,
        )?;
        assert_eq!(
            config,
            DatabaseConfig {
                name: "tasks".to_string(),
                host: "db.flowgrid.dev".to_string(),
                port: 6432,
                username: "flowgrid".to_string(),
                password: Some("password".to_string()),
                max_connections: 20,
            }
        );

        Ok(())
    }
}
