//! QR token generation
//!
//! The QR code is the ticket's capability: whoever presents it gets in.
//! Tokens carry a timestamp plus 64 bits of OS entropy, so they cannot be
//! guessed or enumerated the way a sequential id could.

use ring::rand::{SecureRandom, SystemRandom};

const QR_PREFIX: &str = "AFTR";

/// Generate a globally unique, unforgeable QR token
///
/// Format: `AFTR-<unix millis>-<16 hex chars>`
pub fn generate_qr_code() -> String {
    let mut bytes = [0u8; 8];
    if SystemRandom::new().fill(&mut bytes).is_err() {
        // OS entropy failure is essentially unreachable; keep issuing
        // rather than aborting an approval mid-flight
        use rand::RngCore;
        rand::thread_rng().fill_bytes(&mut bytes);
    }
    format!(
        "{QR_PREFIX}-{}-{}",
        shared::util::now_millis(),
        hex::encode(bytes)
    )
}
