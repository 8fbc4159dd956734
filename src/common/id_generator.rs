// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates prefixed, human-readable row ids: `U_7K2M9QXPZ4` for users,
//! `G_...` for gardens and so on. The alphabet excludes I, L, O and U.

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Random characters after the prefix (32^10 combinations)
const ID_LENGTH: usize = 10;

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// User (U_)
    User,
    /// Garden (G_)
    Garden,
    /// Plant catalogue entry (P_)
    Plant,
    /// Plant placed in a garden (UP_)
    UserPlant,
}

impl EntityPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::User => "U",
            EntityPrefix::Garden => "G",
            EntityPrefix::Plant => "P",
            EntityPrefix::UserPlant => "UP",
        }
    }
}

fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID, e.g. `generate_id(EntityPrefix::Garden)` -> `"G_K7NP3XQ2MA"`
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(ID_LENGTH))
}

pub fn generate_user_id() -> String {
    generate_id(EntityPrefix::User)
}

pub fn generate_garden_id() -> String {
    generate_id(EntityPrefix::Garden)
}

pub fn generate_plant_id() -> String {
    generate_id(EntityPrefix::Plant)
}

pub fn generate_user_plant_id() -> String {
    generate_id(EntityPrefix::UserPlant)
}
