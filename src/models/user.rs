use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Hr,
    Buyer,
    Head,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Hr => "hr",
            Role::Buyer => "buyer",
            Role::Head => "head",
        }
    }

    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hr" => Some(Role::Hr),
            "buyer" => Some(Role::Buyer),
            "head" => Some(Role::Head),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub role: Role,
}
