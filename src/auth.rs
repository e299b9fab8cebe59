use crate::errors::{Error, Result};

/// Every operation in this crate runs on behalf of an identified user.
/// Fails before any storage access when the caller has no identity.
pub fn ensure_user(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(Error::NotAuthenticated);
    }
    Ok(())
}
