// Authentication wire types.
//
// The server issues a JWT from `POST api/authenticate`; every later request
// carries it as `Authorization: Bearer <token>`. A pre-issued token can be
// supplied directly instead of a username/password pair.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// How the client proves who it is.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// A JWT issued earlier, used as-is.
    Token(SecretString),
    /// Login with username and password to obtain a JWT.
    Password {
        username: String,
        password: SecretString,
    },
}

/// Body of `POST api/authenticate`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub remember_me: bool,
}

/// Response of `POST api/authenticate`.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub id_token: String,
}

/// The signed-in principal, from `GET api/account`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub login: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub authorities: Vec<String>,
    #[serde(default)]
    pub lang_key: Option<String>,
}

impl Account {
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}
