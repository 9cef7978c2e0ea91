//! Device authentication primitives.
//!
//! The device proves its identity by signing a digest of its UUID and the
//! current time. The signing itself is done by the host through [`Signer`];
//! this module only derives the digest and encodes the result.

use sha2::{Digest as _, Sha256};
use smallvec::SmallVec;

/// Length of the digest handed to the signer.
pub const DIGEST_LENGTH: usize = 32;
/// Length of the device key handed to the signer.
pub const KEY_LENGTH: usize = 32;
/// Upper bound of a DER-encoded P-256 ECDSA signature.
pub const SIGNATURE_MAX_LENGTH: usize = 72;

/// SHA-256 digest to be signed.
pub type Digest = [u8; DIGEST_LENGTH];
/// Device signing key, opaque to this crate.
pub type Key = [u8; KEY_LENGTH];
/// Signature bytes, at most [`SIGNATURE_MAX_LENGTH`] long.
pub type Signature = SmallVec<[u8; SIGNATURE_MAX_LENGTH]>;

/// Host-supplied signing primitive.
///
/// Called once per authentication attempt, always from the scheduler's
/// default lane, so never concurrently. Returning `None` fails the
/// authentication.
///
/// Any `Fn(&Digest, &Key) -> Option<Signature>` closure is a signer.
pub trait Signer: Send + Sync {
    /// Signs `digest` with `key`.
    fn sign(&self, digest: &Digest, key: &Key) -> Option<Signature>;
}

impl<F> Signer for F
where
    F: Fn(&Digest, &Key) -> Option<Signature> + Send + Sync,
{
    fn sign(&self, digest: &Digest, key: &Key) -> Option<Signature> {
        self(digest, key)
    }
}

/// Digest signed during authentication: `SHA-256(uuid bytes ‖ timestamp)`.
///
/// `uuid_hex` is the 32-digit hex form of the device UUID (no dashes) and
/// `timestamp` the decimal Unix time sent alongside the signature. Returns
/// `None` if `uuid_hex` is not valid hex.
#[must_use]
pub fn signature_digest(uuid_hex: &str, timestamp: &str) -> Option<Digest> {
    let uuid_bytes = hex::decode(uuid_hex).ok()?;
    let mut hasher = Sha256::new();
    hasher.update(&uuid_bytes);
    hasher.update(timestamp.as_bytes());
    Some(hasher.finalize().into())
}

/// Runs `signer` over the digest of `uuid_hex` and `timestamp` and returns
/// the signature hex-encoded, or `None` if either step failed.
#[must_use]
pub fn sign_hex(signer: &dyn Signer, key: &Key, uuid_hex: &str, timestamp: &str) -> Option<String> {
    let digest = signature_digest(uuid_hex, timestamp)?;
    let signature = signer.sign(&digest, key)?;
    if signature.is_empty() || signature.len() > SIGNATURE_MAX_LENGTH {
        return None;
    }
    Some(hex::encode(signature))
}
