use crate::errors::InternalError;

/// Hashes and verifies passwords with bcrypt
///
/// Cost is fixed at construction. Hashing at production cost takes tens of
/// milliseconds, so callers run it on a blocking thread.
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password
    ///
    /// The cost factor is embedded in the hash, so verification works
    /// across cost changes.
    pub fn hash(&self, password: &str) -> Result<String, InternalError> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| InternalError::crypto("hash_password", e.to_string()))
    }

    /// Verify a plaintext password against a stored hash
    ///
    /// A malformed stored hash counts as a mismatch rather than an error,
    /// so a corrupted row cannot be probed apart from a wrong password.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    /// Pay the cost of a verification without a stored hash
    ///
    /// Login calls this when no account matches, so rejecting an unknown
    /// email takes as long as rejecting a wrong password.
    pub fn burn_verification(&self, password: &str) {
        let _ = bcrypt::hash(password, self.cost);
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish()
    }
}
