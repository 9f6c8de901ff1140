use crate::error::AppError;

/// Work factor used when `BCRYPT_COST` is not configured.
pub const DEFAULT_COST: u32 = 12;

/// Salted bcrypt hash of `password`. Costs outside 4..=31 are rejected by bcrypt.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Compares `password` with a stored hash. An unparseable hash is an internal
/// error, not a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    Ok(bcrypt::verify(password, password_hash)?)
}
