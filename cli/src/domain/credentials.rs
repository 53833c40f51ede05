//! Pool service credentials.

use std::fmt;

/// Authentication material for the pooling service.
///
/// Empty means unauthenticated: requests go out without a token.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    vmpooler_token: Option<String>,
}

impl Credentials {
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            vmpooler_token: (!token.is_empty()).then_some(token),
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.vmpooler_token.as_deref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vmpooler_token.is_none()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("vmpooler_token", &self.vmpooler_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
