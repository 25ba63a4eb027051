//! Storage key constants.

/// Storage keys used by the client session.
pub struct StorageKeys;

impl StorageKeys {
    /// Bearer access token
    pub const ACCESS_TOKEN: &'static str = "accessToken";

    /// Refresh token, present only when the backend issued one
    pub const REFRESH_TOKEN: &'static str = "refreshToken";
}
