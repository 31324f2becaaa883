//! Identifier and credential generation: a 20-character `AKIA`-prefixed
//! access key id, a 40-character secret, and a 24-hex-character account id.

use rand::distributions::{Alphanumeric, DistString};
use rand::Rng;

const ACCESS_KEY_PREFIX: &str = "AKIA";
const ACCESS_KEY_SUFFIX_LEN: usize = 20 - 4; // total 20 chars including the prefix
const SECRET_KEY_LEN: usize = 40;
const ACCOUNT_ID_BYTES: usize = 12; // -> 24 hex chars

pub fn generate_access_key_id() -> String {
    let suffix = Alphanumeric.sample_string(&mut rand::thread_rng(), ACCESS_KEY_SUFFIX_LEN);
    format!("{ACCESS_KEY_PREFIX}{}", suffix.to_uppercase())
}

pub fn generate_secret_key() -> String {
    Alphanumeric.sample_string(&mut rand::thread_rng(), SECRET_KEY_LEN)
}

pub fn generate_account_id() -> String {
    let bytes: [u8; ACCOUNT_ID_BYTES] = rand::thread_rng().gen();
    hex::encode(bytes)
}
