//! Cryptographically secure generation of human-typeable codes

use rand::rngs::OsRng;
use rand::Rng;

/// The 36-symbol alphabet codes are drawn from
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generator for short random verification codes
///
/// Stateless; every call draws fresh bytes from the OS CSPRNG. A starved
/// entropy source panics inside the RNG, which is treated as a fatal
/// environment error rather than a recoverable one.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeGenerator;

impl CodeGenerator {
    /// Create a new generator
    pub fn new() -> Self {
        Self
    }

    /// Generate a code of `length` characters drawn uniformly from A-Z0-9
    pub fn generate(&self, length: usize) -> String {
        let mut rng = OsRng;
        (0..length)
            .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_length_and_alphabet() {
        let generator = CodeGenerator::new();

        for length in [4, 6, 8] {
            let code = generator.generate(length);
            assert_eq!(code.len(), length);
            assert!(code
                .bytes()
                .all(|b| CODE_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_codes_do_not_repeat_under_load() {
        let generator = CodeGenerator::new();

        let codes: HashSet<String> = (0..200).map(|_| generator.generate(6)).collect();
        // 36^6 possibilities; 200 draws colliding down to a handful would
        // indicate a broken random source
        assert!(codes.len() > 190);
    }

    #[test]
    fn test_alphabet_covers_full_range_eventually() {
        let generator = CodeGenerator::new();

        let mut seen = HashSet::new();
        for _ in 0..500 {
            seen.extend(generator.generate(6).into_bytes());
        }
        // With 3000 draws over 36 symbols, missing more than a couple of
        // symbols is vanishingly unlikely
        assert!(seen.len() >= 30);
    }
}
