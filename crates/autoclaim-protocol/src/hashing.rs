use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::ProtocolError;

/// Compute SHA-256 hash of data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let hash = Sha256::digest(data);
    let mut result = [0u8; 32];
    result.copy_from_slice(&hash);
    result
}

/// Hex SHA-256 of the JSON encoding of a report.
///
/// Field order follows the struct declaration, so equal reports hash equal.
pub fn compute_report_hash<T: Serialize>(report: &T) -> Result<String, ProtocolError> {
    let bytes = serde_json::to_vec(report)?;
    Ok(hex::encode(sha256(&bytes)))
}

/// Short display token in the `0x1a2b...3c4d` style used on receipts.
pub fn decorative_token() -> String {
    let mut rng = rand::thread_rng();
    let head: u16 = rng.gen();
    let tail: u16 = rng.gen();
    format!("0x{head:04x}...{tail:04x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Report<'a> {
        photos: usize,
        description: &'a str,
    }

    #[test]
    fn report_hash_is_stable_hex() {
        let a = compute_report_hash(&Report { photos: 4, description: "rear ended" }).unwrap();
        let b = compute_report_hash(&Report { photos: 4, description: "rear ended" }).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn report_hash_changes_with_content() {
        let a = compute_report_hash(&Report { photos: 4, description: "a" }).unwrap();
        let b = compute_report_hash(&Report { photos: 3, description: "a" }).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn decorative_token_shape() {
        let token = decorative_token();
        assert!(token.starts_with("0x"));
        assert_eq!(token.len(), 13);
        assert_eq!(&token[6..9], "...");
    }
}
