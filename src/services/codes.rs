//! Random identifiers and generated passwords

use rand::Rng;

const UPPER_ALNUM: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const LOWER_ALNUM: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

fn random_from(charset: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}

/// Upper-case letters and digits
pub fn upper_code(len: usize) -> String {
    random_from(UPPER_ALNUM, len)
}

/// Lower-case letters and digits
pub fn lower_code(len: usize) -> String {
    random_from(LOWER_ALNUM, len)
}

/// Initial password for a new staff account, e.g. `STAF427`
pub fn staff_password() -> String {
    format!("STAF{}", rand::thread_rng().gen_range(100..1000))
}
