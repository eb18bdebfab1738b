//! License key generation.

use rand::RngCore;

/// Key length in characters when the caller has no preference.
pub const DEFAULT_KEY_LENGTH: usize = 16;

/// Generates an uppercase hexadecimal license key.
///
/// Draws `length / 2` bytes from the OS random source, so an odd `length`
/// yields `length - 1` characters. The default length carries 64 bits of
/// entropy. No uniqueness check is made against stored records.
#[must_use]
pub fn generate_license_key(length: usize) -> String {
    let mut bytes = vec![0u8; length / 2];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode_upper(bytes)
}
