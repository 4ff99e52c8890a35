//! Numeric verification code generation.

use rand::Rng;

/// Generates fixed-length numeric verification codes.
///
/// Codes are drawn uniformly from the full n-digit range (no leading
/// zeros), e.g. [100000, 999999] for six digits. They are not
/// cryptographically hardened; short TTLs, delivery to a verified
/// channel, and issuance limits are the actual defenses.
#[derive(Debug, Clone, Copy)]
pub struct OtpGenerator {
    code_length: usize,
}

impl OtpGenerator {
    /// Creates a generator for codes of the given digit count.
    pub fn new(code_length: usize) -> Self {
        Self { code_length }
    }

    /// Draws a fresh code.
    pub fn generate(&self) -> String {
        let lower = 10u64.pow(self.code_length as u32 - 1);
        let upper = 10u64.pow(self.code_length as u32) - 1;
        rand::rng().random_range(lower..=upper).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_have_the_configured_length() {
        let generator = OtpGenerator::new(6);
        for _ in 0..200 {
            let code = generator.generate();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.as_bytes()[0], b'0');
        }
    }

    #[test]
    fn other_lengths_are_respected() {
        assert_eq!(OtpGenerator::new(4).generate().len(), 4);
        assert_eq!(OtpGenerator::new(8).generate().len(), 8);
    }

    #[test]
    fn consecutive_codes_vary() {
        let generator = OtpGenerator::new(6);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..50 {
            seen.insert(generator.generate());
        }
        assert!(seen.len() > 1);
    }
}
