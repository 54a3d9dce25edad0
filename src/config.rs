use crate::error::{Error, Result};
use crate::models::user::Role;
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct AllowedUser {
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub meet_webhook_url: Option<String>,
    pub api_rps: u32,
    pub allowed_users: Vec<AllowedUser>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            session_secret: get_env("SESSION_SECRET")?,
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .map(|raw| {
                    raw.parse().map_err(|e| {
                        Error::Config(format!("Invalid value for SESSION_TTL_HOURS: {}", e))
                    })
                })
                .transpose()?
                .unwrap_or(24),
            meet_webhook_url: env::var("MEET_WEBHOOK_URL").ok(),
            api_rps: get_env_parse("API_RPS")?,
            allowed_users: parse_allowed_users(&get_env("ALLOWED_USERS")?)?,
        })
    }

    /// Case-insensitive lookup in the configured user directory.
    pub fn find_user(&self, email: &str) -> Option<&AllowedUser> {
        let needle = email.trim().to_ascii_lowercase();
        self.allowed_users
            .iter()
            .find(|u| u.email.to_ascii_lowercase() == needle)
    }
}

/// `ALLOWED_USERS` is a comma-separated list of `email:role` pairs, e.g.
/// `anna.hr@company.com:hr,head@company.com:head`.
fn parse_allowed_users(raw: &str) -> Result<Vec<AllowedUser>> {
    let mut users = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (email, role) = entry.split_once(':').ok_or_else(|| {
            Error::Config(format!("Malformed ALLOWED_USERS entry: {}", entry))
        })?;
        let role = Role::parse(role)
            .ok_or_else(|| Error::Config(format!("Unknown role in ALLOWED_USERS: {}", role)))?;
        users.push(AllowedUser {
            email: email.trim().to_string(),
            role,
        });
    }
    if users.is_empty() {
        return Err(Error::Config("ALLOWED_USERS must list at least one user".into()));
    }
    Ok(users)
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_allowed_users() {
        let users =
            parse_allowed_users("anna.hr@company.com:hr, head@company.com:head").unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].email, "anna.hr@company.com");
        assert_eq!(users[0].role, Role::Hr);
        assert_eq!(users[1].role, Role::Head);
    }

    #[test]
    fn rejects_unknown_role() {
        assert!(parse_allowed_users("a@b.co:admin").is_err());
    }
}
