use rand::Rng;

const UPPER_ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const LOWER_ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub const ID_LEN: usize = 9;

fn random_from(charset: &[u8], len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| char::from(charset[rng.random_range(0..charset.len())]))
        .collect()
}

/// Proposal number shown to members and administrators, e.g. `K3Z8Q1M0A`
pub fn submission_id() -> String {
    random_from(UPPER_ALPHANUMERIC, ID_LEN)
}

/// Identifier of a dependent inside one draft
pub fn dependent_id() -> String {
    random_from(LOWER_ALPHANUMERIC, ID_LEN)
}
