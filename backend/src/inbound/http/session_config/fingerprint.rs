//! Short, non-reversible identifier for the session key, logged at startup
//! so operators can confirm which key each instance loaded.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const PREFIX_BYTES: usize = 8;

/// First eight bytes of `SHA-256(signing key)`, hex encoded.
///
/// ```
/// use actix_web::cookie::Key;
/// use civic_complaints::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::derive_from(&[7; 64]));
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..PREFIX_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b'a', b'a', true)]
    #[case(b'a', b'b', false)]
    fn fingerprint_tracks_key_material(#[case] left: u8, #[case] right: u8, #[case] same: bool) {
        let left = key_fingerprint(&Key::derive_from(&[left; 64]));
        let right = key_fingerprint(&Key::derive_from(&[right; 64]));
        assert_eq!(left == right, same);
    }

    #[rstest]
    fn fingerprint_is_lowercase_hex() {
        let fp = key_fingerprint(&Key::generate());
        assert_eq!(fp.len(), PREFIX_BYTES * 2);
        assert!(fp.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
    }
}
