//! Endpoint paths and header values for the identity provider and Microsoft Graph

/// Token endpoint relative to the authority (v2.0 endpoints take `scope`, not `resource`)
pub const TOKEN_PATH: &str = "oauth2/v2.0/token";

/// Grant type sent with every token request
pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

/// User collection relative to the Graph base URL
pub const USERS_PATH: &str = "users";

/// Projection requested for every listed user
pub const USER_SELECT: &str = "id,userPrincipalName";

/// Standard headers for Graph requests
pub mod headers {
    pub const AUTHORIZATION: &str = "Authorization";

    pub const ACCEPT: &str = "Accept";

    pub const CONTENT_TYPE_JSON: &str = "application/json";
}

/// User agent sent on every request
pub fn user_agent() -> String {
    format!("directory-cli/{}", env!("CARGO_PKG_VERSION"))
}

/// Build the user collection URL for a Graph base URL such as `https://graph.microsoft.com/v1.0`
pub fn users_endpoint(base_url: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), USERS_PATH)
}

/// Build the token endpoint for an authority such as `https://login.microsoftonline.com/<tenant>`
pub fn token_endpoint(authority: &str) -> String {
    format!("{}/{}", authority.trim_end_matches('/'), TOKEN_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_ignore_trailing_slash() {
        assert_eq!(
            users_endpoint("https://graph.microsoft.com/v1.0/"),
            "https://graph.microsoft.com/v1.0/users"
        );
        assert_eq!(
            token_endpoint("https://login.microsoftonline.com/contoso"),
            "https://login.microsoftonline.com/contoso/oauth2/v2.0/token"
        );
    }
}
