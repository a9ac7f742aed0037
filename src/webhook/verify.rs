use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

use crate::error::{Result, SyncError};

type HmacSha256 = Hmac<Sha256>;

/// Default accepted clock skew for the `svix-timestamp` header.
pub const DEFAULT_TIMESTAMP_TOLERANCE: Duration = Duration::from_secs(300); // 5 minutes

/// The three signature headers attached to every Svix delivery.
#[derive(Debug, Clone, Copy)]
pub struct SvixHeaders<'a> {
    pub id: &'a str,
    pub timestamp: &'a str,
    pub signature: &'a str,
}

/// Verifier for the Svix webhook signing scheme.
///
/// The signed content is `"{id}.{timestamp}.{body}"`, signed with HMAC-SHA256
/// using the base64-decoded portion of the `whsec_...` secret. The
/// `svix-signature` header carries one or more space-separated
/// `v1,<base64 signature>` entries; verification succeeds if any entry
/// matches. The timestamp must be within the configured tolerance of the
/// current time, which bounds the replay window.
///
/// # Example
///
/// ```rust,ignore
/// let verifier = SvixVerifier::new("whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw")?;
/// verifier.verify(body.as_bytes(), &SvixHeaders { id, timestamp, signature })?;
/// ```
pub struct SvixVerifier {
    key: Vec<u8>,
    tolerance: Duration,
}

impl SvixVerifier {
    /// Create a verifier from the dashboard secret (`whsec_` prefix optional)
    pub fn new(secret: &str) -> Result<Self> {
        let encoded = secret.strip_prefix("whsec_").unwrap_or(secret);
        let key = BASE64
            .decode(encoded)
            .map_err(|e| SyncError::config(format!("webhook secret is not valid base64: {}", e)))?;

        Ok(Self {
            key,
            tolerance: DEFAULT_TIMESTAMP_TOLERANCE,
        })
    }

    /// Override the accepted timestamp tolerance
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Verify a delivery against its signature headers.
    ///
    /// Returns `Ok(())` only when the timestamp is within tolerance and at
    /// least one `v1` signature entry matches the payload.
    pub fn verify(&self, payload: &[u8], headers: &SvixHeaders<'_>) -> Result<()> {
        let timestamp: i64 = headers
            .timestamp
            .parse()
            .map_err(|_| SyncError::invalid_signature("timestamp header is not a number"))?;

        self.check_timestamp(timestamp)?;

        let expected = self.compute_signature(headers.id, timestamp, payload);

        // The header may list several signatures (e.g. after a secret
        // rotation); any matching v1 entry authenticates the delivery.
        for entry in headers.signature.split_whitespace() {
            let Some((version, sig)) = entry.split_once(',') else {
                continue;
            };
            if version != "v1" {
                continue;
            }
            let Ok(provided) = BASE64.decode(sig) else {
                continue;
            };
            if bool::from(expected.ct_eq(&provided)) {
                return Ok(());
            }
        }

        Err(SyncError::invalid_signature("no matching signature"))
    }

    /// Compute the `v1,<base64>` signature entry for a delivery.
    ///
    /// Counterpart to [`verify`](Self::verify); used by tests to produce
    /// authentic deliveries without a live sender.
    pub fn sign(&self, msg_id: &str, timestamp: i64, payload: &[u8]) -> String {
        let sig = self.compute_signature(msg_id, timestamp, payload);
        format!("v1,{}", BASE64.encode(sig))
    }

    fn compute_signature(&self, msg_id: &str, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size");
        mac.update(msg_id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }

    fn check_timestamp(&self, timestamp: i64) -> Result<()> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| SyncError::internal("system clock before unix epoch"))?
            .as_secs() as i64;

        let tolerance = self.tolerance.as_secs() as i64;
        if timestamp < now - tolerance {
            return Err(SyncError::invalid_signature("timestamp too old"));
        }
        if timestamp > now + tolerance {
            return Err(SyncError::invalid_signature("timestamp too new"));
        }

        Ok(())
    }
}

impl std::fmt::Debug for SvixVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvixVerifier")
            .field("key", &"[REDACTED]")
            .field("tolerance", &self.tolerance)
            .finish()
    }
}
