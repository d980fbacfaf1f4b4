// Base58 transcription of output documents

use crate::error::Result;

/// Encodes raw bytes with the Bitcoin base58 alphabet.
pub fn encode_base58(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

pub fn decode_base58(text: &str) -> Result<Vec<u8>> {
    Ok(bs58::decode(text.trim()).into_vec()?)
}
