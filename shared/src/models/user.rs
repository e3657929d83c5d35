//! User Model

use serde::{Deserialize, Serialize};

/// Actor role
///
/// Capability sets are attached to roles by the server's permission table;
/// roles themselves carry no inheritance (an Admin is not a Supervisor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Role {
    Employee,
    Supervisor,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Self::Employee
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "EMPLOYEE",
            Role::Supervisor => "SUPERVISOR",
            Role::Admin => "ADMIN",
        }
    }

    /// Salary applied at creation when the payload omits one.
    pub fn default_salary(&self) -> f64 {
        match self {
            Role::Employee => 45000.00,
            Role::Supervisor => 60000.00,
            Role::Admin => 80000.00,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EMPLOYEE" => Ok(Role::Employee),
            "SUPERVISOR" => Ok(Role::Supervisor),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// User entity (DB row)
///
/// `hash_pass` stays server-side; API responses use [`UserInfo`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub phone: String,
    pub hash_pass: String,
    pub role: Role,
    pub salary: f64,
    /// Performance rating, 1..=5
    pub rating: i64,
    pub is_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    pub fn info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            phone: self.phone.clone(),
            role: self.role,
            salary: self.salary,
            rating: self.rating,
            is_deleted: self.is_deleted,
            created_at: self.created_at,
        }
    }
}

/// Public view of a user (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub phone: String,
    pub role: Role,
    pub salary: f64,
    pub rating: i64,
    pub is_deleted: bool,
    pub created_at: i64,
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Defaults to Employee
    #[serde(default)]
    pub role: Option<Role>,
    /// Defaults to the role's base salary
    #[serde(default)]
    pub salary: Option<f64>,
    /// Defaults to 5
    #[serde(default)]
    pub rating: Option<i64>,
}

/// Update user payload
///
/// All fields optional; the server drops fields the acting role may not
/// touch before anything is written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub password: Option<String>,
    pub salary: Option<f64>,
    pub rating: Option<i64>,
}

impl UserUpdate {
    /// True when no field survives to be written.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone.is_none()
            && self.role.is_none()
            && self.password.is_none()
            && self.salary.is_none()
            && self.rating.is_none()
    }
}
