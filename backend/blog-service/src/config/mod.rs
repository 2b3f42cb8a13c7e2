use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub auth: AuthConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Keep posts and notes in process memory instead of Postgres
    #[serde(default)]
    pub in_memory: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_login_url")]
    pub login_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Pause applied by admin actions before they persist, so pending UI is visible
    #[serde(default = "default_action_delay_ms")]
    pub action_delay_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    10
}

fn default_cookie_name() -> String {
    "session".to_string()
}

fn default_login_url() -> String {
    "/login".to_string()
}

fn default_action_delay_ms() -> u64 {
    1000
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("database.url", "postgres://localhost/blog")?
            .set_default("database.max_connections", default_max_connections())?
            .set_default("database.in_memory", false)?
            .set_default("jwt.secret", "development-secret-change-in-production")?
            .set_default("auth.cookie_name", default_cookie_name())?
            .set_default("auth.login_url", default_login_url())?
            .set_default("app.action_delay_ms", default_action_delay_ms())?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// In-memory configuration with no action delay, used by local runs and tests.
    pub fn in_memory(jwt_secret: &str) -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: default_port(),
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: default_max_connections(),
                in_memory: true,
            },
            jwt: JwtConfig {
                secret: jwt_secret.to_string(),
            },
            auth: AuthConfig {
                cookie_name: default_cookie_name(),
                login_url: default_login_url(),
            },
            app: AppConfig { action_delay_ms: 0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_config_disables_delay() {
        let config = Config::in_memory("secret");
        assert!(config.database.in_memory);
        assert_eq!(config.app.action_delay_ms, 0);
        assert_eq!(config.auth.cookie_name, "session");
        assert_eq!(config.auth.login_url, "/login");
    }
}
