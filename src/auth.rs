use std::fmt;

/// Bearer credentials for one provider, obtained outside this crate and
/// passed explicitly into every provider call.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthContext {
    access_token: String,
}

impl AuthContext {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn bearer_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("access_token", &"<redacted>")
            .finish()
    }
}
