use sha2::{Digest, Sha256};

/// SHA-256 applied twice, each pass over the raw digest bytes of the previous one.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

/// Double SHA-256 over `parts` concatenated, without allocating the candidate.
pub fn double_sha256_parts(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let first = hasher.finalize();
    Sha256::digest(first).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sha256(data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }

    #[test]
    fn double_sha256_of_empty_input() {
        let expected =
            hex::decode("5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456")
                .unwrap();
        assert_eq!(double_sha256(b"").to_vec(), expected);
    }

    #[test]
    fn double_sha256_of_hello() {
        let expected =
            hex::decode("9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50")
                .unwrap();
        assert_eq!(double_sha256(b"hello").to_vec(), expected);
    }

    #[test]
    fn double_sha256_hashes_raw_digest_not_hex() {
        let data = b"hello world";
        assert_eq!(double_sha256(data), sha256(&sha256(data)));

        let hex_pass = sha256(hex::encode(sha256(data)).as_bytes());
        assert_ne!(double_sha256(data), hex_pass);
    }

    #[test]
    fn parts_match_concatenation() {
        let joined = b"header00000001";
        assert_eq!(
            double_sha256_parts(&[b"header".as_slice(), b"00000001".as_slice()]),
            double_sha256(joined)
        );
        assert_eq!(double_sha256_parts(&[]), double_sha256(b""));
    }
}
