use serde::{Deserialize, Serialize};

use crate::types::db::{user, Role};

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user id, stringified)
    pub sub: String,

    /// Email at issuance time
    pub email: String,

    /// Role at issuance time
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Claims carried by a refresh token
///
/// Signed with a secret disjoint from the access token secret so that
/// compromise of one signing domain does not compromise the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (user id, stringified)
    pub sub: String,

    /// Token lineage identifier
    pub jti: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Identity resolved from a verified bearer credential and a live user row
///
/// Constructed only by the authenticator, never partially populated. The role
/// comes from the user row, not the token, so a role change takes effect on
/// the next request rather than at token expiry.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub avatar_url: Option<String>,
}

impl From<user::Model> for AuthenticatedUser {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            display_name: u.display_name,
            role: u.role,
            avatar_url: u.avatar_url,
        }
    }
}
