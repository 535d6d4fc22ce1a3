//! Wire and domain types for the user directory

use serde::Deserialize;
use std::fmt;

/// One listed user. Only the projected fields are kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "userPrincipalName", default)]
    pub user_principal_name: Option<String>,
}

impl DirectoryEntry {
    pub fn new(id: impl Into<String>, user_principal_name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            user_principal_name: Some(user_principal_name.into()),
        }
    }
}

impl fmt::Display for DirectoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User [id={},userPrincipalName={}]",
            self.id.as_deref().unwrap_or("null"),
            self.user_principal_name.as_deref().unwrap_or("null")
        )
    }
}

/// OData collection body returned by `GET /users`.
#[derive(Debug, Deserialize)]
pub struct UserCollection {
    pub value: Vec<DirectoryEntry>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

impl UserCollection {
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }
}
