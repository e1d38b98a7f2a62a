use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// Signing configuration for a [`JwtHandler`].
///
/// Passed in at construction so every handler instance can carry its own key
/// and lifetime.
#[derive(Clone)]
pub struct TokenConfig {
    pub secret: Vec<u8>,
    pub ttl: Duration,
    pub issuer: Option<String>,
}

impl TokenConfig {
    pub fn new(secret: impl AsRef<[u8]>, ttl: Duration) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            ttl,
            issuer: None,
        }
    }

    pub fn with_issuer(mut self, issuer: Option<String>) -> Self {
        self.issuer = issuer;
        self
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// Bearer token codec.
///
/// Issues compact HS256 tokens (`header.payload.signature`) and verifies them.
/// Signature checks happen in [`JwtHandler::decode`]; expiry is evaluated
/// separately against the wall clock on every validity check.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
    issuer: Option<String>,
}

impl JwtHandler {
    /// Create a new JWT handler.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(config: TokenConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&config.secret),
            decoding_key: DecodingKey::from_secret(&config.secret),
            algorithm: Algorithm::HS256,
            ttl: config.ttl,
            issuer: config.issuer,
        }
    }

    /// Token lifetime applied by [`JwtHandler::issue`].
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `subject`, valid from now until now + TTL.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject: &str) -> Result<String, JwtError> {
        let claims =
            Claims::for_subject(subject, Utc::now(), self.ttl).with_issuer(self.issuer.clone());
        self.encode(&claims)
    }

    /// Sign arbitrary claims with this handler's key.
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify the token's structure and signature and return its claims.
    ///
    /// Expired tokens still decode; use [`JwtHandler::is_valid`] or
    /// [`JwtHandler::is_valid_for`] to include the expiry check.
    ///
    /// # Errors
    /// * `Malformed` - Not a compact token, bad encoding, or missing claims
    /// * `InvalidSignature` - Signature or issuer does not match
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
            validation.required_spec_claims.insert("iss".to_string());
        }

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidIssuer => {
                    JwtError::InvalidSignature
                }
                _ => JwtError::Malformed(e.to_string()),
            })
    }

    /// Token decodes and has not expired.
    pub fn is_valid(&self, token: &str) -> bool {
        self.is_valid_at(token, Utc::now())
    }

    /// Token decodes, names `expected_subject`, and has not expired.
    pub fn is_valid_for(&self, token: &str, expected_subject: &str) -> bool {
        self.is_valid_for_at(token, expected_subject, Utc::now())
    }

    fn is_valid_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.decode(token)
            .map(|claims| !claims.is_expired(now.timestamp()))
            .unwrap_or(false)
    }

    fn is_valid_for_at(&self, token: &str, expected_subject: &str, now: DateTime<Utc>) -> bool {
        self.decode(token)
            .map(|claims| claims.sub == expected_subject && !claims.is_expired(now.timestamp()))
            .unwrap_or(false)
    }
}
