//! TSS signature verification
//!
//! Signatures are 65 bytes `r || s || v`. Recovery goes through the host's
//! secp256k1 primitive; the recovered key is compared against the
//! uncompressed form of the expected key.

use cosmwasm_std::{Api, Binary};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;

use crate::error::ContractError;

pub const SIGNATURE_LENGTH: usize = 65;
pub const COMPRESSED_KEY_LENGTH: usize = 33;

/// Expand a 33-byte compressed secp256k1 key to its 65-byte uncompressed form.
pub fn decompress_pubkey(compressed: &[u8]) -> Result<Vec<u8>, ContractError> {
    if compressed.len() != COMPRESSED_KEY_LENGTH {
        return Err(ContractError::InvalidPublicKey);
    }
    let key = PublicKey::from_sec1_bytes(compressed).map_err(|_| ContractError::InvalidPublicKey)?;
    Ok(key.to_encoded_point(false).as_bytes().to_vec())
}

/// Recover the uncompressed public key that produced `signature` over `digest`.
pub fn recover_pubkey(
    api: &dyn Api,
    digest: &[u8; 32],
    signature: &[u8],
) -> Result<Vec<u8>, ContractError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(ContractError::InvalidECDSASignature);
    }
    let recovery_param = match signature[64] {
        v @ (0 | 1) => v,
        v @ (27 | 28) => v - 27,
        _ => return Err(ContractError::InvalidECDSASignature),
    };
    api.secp256k1_recover_pubkey(digest, &signature[..64], recovery_param)
        .map_err(|_| ContractError::InvalidECDSASignature)
}

/// Fails with `InvalidECDSASignature` unless `signature` recovers to `expected`.
pub fn verify_signature(
    api: &dyn Api,
    digest: &[u8; 32],
    signature: &Binary,
    expected: &[u8],
) -> Result<(), ContractError> {
    let recovered = recover_pubkey(api, digest, signature.as_slice())?;
    if recovered != expected {
        return Err(ContractError::InvalidECDSASignature);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::mock_dependencies;
    use k256::ecdsa::SigningKey;

    fn sign(key: &SigningKey, digest: &[u8; 32], v_offset: u8) -> Binary {
        let (sig, recid) = key.sign_prehash_recoverable(digest).unwrap();
        let mut bytes = sig.to_bytes().to_vec();
        bytes.push(recid.to_byte() + v_offset);
        Binary::from(bytes)
    }

    fn uncompressed(key: &SigningKey) -> Vec<u8> {
        key.verifying_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec()
    }

    #[test]
    fn test_decompress_matches_uncompressed_encoding() {
        let key = SigningKey::from_slice(&[7u8; 32]).unwrap();
        let compressed = key.verifying_key().to_encoded_point(true);
        assert_eq!(
            decompress_pubkey(compressed.as_bytes()).unwrap(),
            uncompressed(&key)
        );
    }

    #[test]
    fn test_decompress_rejects_bad_keys() {
        assert_eq!(
            decompress_pubkey(&[2u8; 32]),
            Err(ContractError::InvalidPublicKey)
        );
        let mut bad = [0u8; 33];
        bad[0] = 5;
        assert_eq!(decompress_pubkey(&bad), Err(ContractError::InvalidPublicKey));
    }

    #[test]
    fn test_verify_accepts_both_v_conventions() {
        let deps = mock_dependencies();
        let key = SigningKey::from_slice(&[3u8; 32]).unwrap();
        let digest = [9u8; 32];

        for v_offset in [0, 27] {
            let signature = sign(&key, &digest, v_offset);
            verify_signature(&deps.api, &digest, &signature, &uncompressed(&key)).unwrap();
        }
    }

    #[test]
    fn test_verify_rejects_other_key() {
        let deps = mock_dependencies();
        let key = SigningKey::from_slice(&[3u8; 32]).unwrap();
        let other = SigningKey::from_slice(&[4u8; 32]).unwrap();
        let digest = [9u8; 32];

        let signature = sign(&other, &digest, 0);
        assert_eq!(
            verify_signature(&deps.api, &digest, &signature, &uncompressed(&key)),
            Err(ContractError::InvalidECDSASignature)
        );
    }

    #[test]
    fn test_verify_rejects_malformed_signature() {
        let deps = mock_dependencies();
        let key = SigningKey::from_slice(&[3u8; 32]).unwrap();
        let digest = [9u8; 32];

        let mut signature = sign(&key, &digest, 0).to_vec();
        signature[64] = 4;
        assert_eq!(
            verify_signature(
                &deps.api,
                &digest,
                &Binary::from(signature.clone()),
                &uncompressed(&key)
            ),
            Err(ContractError::InvalidECDSASignature)
        );

        signature.truncate(64);
        assert_eq!(
            verify_signature(&deps.api, &digest, &Binary::from(signature), &uncompressed(&key)),
            Err(ContractError::InvalidECDSASignature)
        );
    }
}
