//! Identifier minting for sites and profiles.
//!
//! The browser runtime stores ids in the shape of a ULID: 26 characters of
//! Crockford base32 whose first character encodes the top bits of a 48-bit
//! millisecond timestamp and is therefore limited to `0`-`7`. We only need
//! the shape, not the timestamp, so every character is random.

use rand::Rng;

/// Crockford base32 (no I, L, O, U).
const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
const ID_LEN: usize = 26;

/// Mint a new identifier.
pub fn new_id() -> String {
  let mut rng = rand::rng();
  let mut id = String::with_capacity(ID_LEN);
  id.push(ALPHABET[rng.random_range(0..8)] as char);
  for _ in 1..ID_LEN {
    id.push(ALPHABET[rng.random_range(0..ALPHABET.len())] as char);
  }
  id
}
