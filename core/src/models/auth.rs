// core/src/models/auth.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
  pub email: &'a str,
  pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
  pub token: String,
  #[serde(default)]
  pub user: Option<LoginUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
  #[serde(default)]
  pub email: Option<String>,
}

impl LoginResponse {
  pub fn user_email(&self) -> Option<&str> {
    self.user.as_ref().and_then(|u| u.email.as_deref())
  }
}
