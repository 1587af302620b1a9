use crate::domain::{AppError, Version};

/// First MongoDB release whose auth the server configuration may target.
pub const MONGO_AUTH_MIN_VERSION: [u32; 3] = [2, 6, 0];

/// Decides whether database auth fields may be emitted.
pub struct CapabilityGate;

impl CapabilityGate {
    /// `true` iff a database version is known and is at least 2.6.0.
    pub fn auth_allowed(database_version: Option<&str>) -> Result<bool, AppError> {
        let Some(raw) = database_version else {
            return Ok(false);
        };
        let version = Version::parse(raw)?;
        Ok(version >= Version::new(MONGO_AUTH_MIN_VERSION))
    }
}
