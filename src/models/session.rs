use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `POST /api/auth` body. The password is kept as raw JSON so a
/// non-string value is rejected as a wrong password instead of a
/// decoding failure.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: Option<Value>,
}

/// What the caller put in the `password` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmittedPassword<'a> {
    /// Absent, `null`, `false`, `0` or `""`.
    Missing,
    Text(&'a str),
    /// Any other JSON value. Never equal to the configured password.
    NotText,
}

impl LoginRequest {
    pub fn password(&self) -> SubmittedPassword<'_> {
        match &self.password {
            None | Some(Value::Null) | Some(Value::Bool(false)) => SubmittedPassword::Missing,
            Some(Value::String(s)) if s.is_empty() => SubmittedPassword::Missing,
            Some(Value::String(s)) => SubmittedPassword::Text(s.as_str()),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => SubmittedPassword::Missing,
            Some(_) => SubmittedPassword::NotText,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
}

/// Query string shared by `GET` and `DELETE /api/token`.
/// Empty values count as missing.
#[derive(Debug, Default)]
pub struct TokenQuery {
    pub room: Option<String>,
    pub username: Option<String>,
}

impl TokenQuery {
    /// Build from decoded query pairs. A repeated key keeps its first value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = TokenQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "room" => &mut query.room,
                "username" => &mut query.username,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }

    pub fn room(&self) -> Option<&str> {
        self.room.as_deref().filter(|r| !r.is_empty())
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
