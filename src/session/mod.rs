use rand::{rngs::OsRng, RngCore};

/// Number of random bytes behind a session token.
pub const TOKEN_BYTES: usize = 32;

/// Generates an opaque session token: 32 bytes from the OS random source,
/// hex encoded to 64 characters.
///
/// Panics if the OS random source is unavailable.
pub fn generate() -> String {
    let mut buffer = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut buffer);
    hex::encode(buffer)
}
