use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role. Matches the `role` column in the `users` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Student,
    Company,
    Other(String),
}

impl Role {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "student" => Role::Student,
            // "employer" is an older spelling of the company role
            "company" | "employer" => Role::Company,
            other => Role::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Student => "student",
            Role::Company => "company",
            Role::Other(s) => s.as_str(),
        }
    }

    pub fn is_student(&self) -> bool {
        matches!(self, Role::Student)
    }
}

impl Serialize for Role {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Role::from_str(&s))
    }
}

/// A platform account. Company accounts carry the public company profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub role: Role,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub profile_picture: Option<String>,
}

impl User {
    pub fn student(id: Uuid) -> Self {
        Self {
            id,
            role: Role::Student,
            company_name: None,
            industry: None,
            profile_picture: None,
        }
    }

    pub fn company(id: Uuid, name: &str, industry: &str) -> Self {
        Self {
            id,
            role: Role::Company,
            company_name: Some(name.to_string()),
            industry: Some(industry.to_string()),
            profile_picture: None,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub role: String,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub profile_picture: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            role: Role::from_str(&row.role),
            company_name: row.company_name,
            industry: row.industry,
            profile_picture: row.profile_picture,
        }
    }
}

/// Authenticated caller, resolved from the session cookie.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role.clone(),
        }
    }
}
