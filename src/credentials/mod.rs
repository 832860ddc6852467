//! Static access/secret key pair used to sign requests.
//!
//! The provider only ever signs with the long-term keys from its
//! configuration block, so there is no provider chain and no refresh.

use secrecy::{ExposeSecret, SecretString};

/// Key pair for one provider configuration.
///
/// `Debug` output never contains the secret key.
#[derive(Clone, Debug)]
pub struct AwsCredentials {
    access_key_id: String,
    secret_access_key: SecretString,
}

impl AwsCredentials {
    /// Create credentials from an access key id and its secret.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::new(secret_access_key.into()),
        }
    }

    /// The access key id, sent in clear in the credential scope.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// The secret key. Only the signing key derivation should call this.
    pub fn secret_access_key(&self) -> &str {
        self.secret_access_key.expose_secret()
    }
}
