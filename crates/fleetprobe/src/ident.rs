//! Synthetic identifiers for test-data isolation.
//!
//! Values follow the format of real medallion numbers, VINs and DMV license
//! numbers but carry no meaning. Randomness is non-cryptographic and values
//! are not guaranteed unique across calls.

use rand::Rng;

/// VIN alphabet: `A-Z0-9` without `I`, `O` and `Q`
pub const VIN_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPRSTUVWXYZ0123456789";

/// Length of a VIN
pub const VIN_LENGTH: usize = 17;

fn digit<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from(b'0' + rng.gen_range(0..10u8))
}

fn upper<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from(b'A' + rng.gen_range(0..26u8))
}

/// Medallion number: digit, letter, digit, digit (e.g. `5X41`)
pub fn medallion_number_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    [digit(rng), upper(rng), digit(rng), digit(rng)]
        .into_iter()
        .collect()
}

/// Medallion number from the thread-local RNG
#[must_use]
pub fn medallion_number() -> String {
    medallion_number_with(&mut rand::thread_rng())
}

/// 17-character VIN (no check digit)
pub fn vin_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..VIN_LENGTH)
        .map(|_| char::from(VIN_ALPHABET[rng.gen_range(0..VIN_ALPHABET.len())]))
        .collect()
}

/// VIN from the thread-local RNG
#[must_use]
pub fn vin() -> String {
    vin_with(&mut rand::thread_rng())
}

/// DMV license number: one letter and seven digits (e.g. `K4820193`)
pub fn dmv_license_number_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    std::iter::once(upper(rng))
        .chain((0..7).map(|_| digit(rng)))
        .collect()
}

/// DMV license number from the thread-local RNG
#[must_use]
pub fn dmv_license_number() -> String {
    dmv_license_number_with(&mut rand::thread_rng())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use regex::Regex;

    #[test]
    fn test_medallion_format_bulk() {
        let re = Regex::new(r"^\d[A-Z]\d\d$").unwrap();
        for _ in 0..1000 {
            let value = medallion_number();
            assert!(re.is_match(&value), "{value}");
        }
    }

    #[test]
    fn test_vin_format_bulk() {
        for _ in 0..1000 {
            let value = vin();
            assert_eq!(value.len(), VIN_LENGTH);
            assert!(!value.contains(['I', 'O', 'Q']), "{value}");
            assert!(value.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_dmv_format_bulk() {
        let re = Regex::new(r"^[A-Z]\d{7}$").unwrap();
        for _ in 0..1000 {
            let value = dmv_license_number();
            assert!(re.is_match(&value), "{value}");
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        assert_eq!(vin_with(&mut a), vin_with(&mut b));
        assert_eq!(medallion_number_with(&mut a), medallion_number_with(&mut b));
        assert_eq!(dmv_license_number_with(&mut a), dmv_license_number_with(&mut b));
    }

    #[test]
    fn test_vin_alphabet_excludes_ambiguous_letters() {
        assert_eq!(VIN_ALPHABET.len(), 33);
        assert!(!VIN_ALPHABET.contains(&b'I'));
        assert!(!VIN_ALPHABET.contains(&b'O'));
        assert!(!VIN_ALPHABET.contains(&b'Q'));
    }

    proptest! {
        #[test]
        fn prop_any_seed_yields_valid_identifiers(seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let medallion = medallion_number_with(&mut rng);
            let dmv = dmv_license_number_with(&mut rng);
            let vin = vin_with(&mut rng);
            let medallion_re = Regex::new(r"^\d[A-Z]\d\d$").unwrap();
            let dmv_re = Regex::new(r"^[A-Z]\d{7}$").unwrap();
            let vin_re = Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").unwrap();
            prop_assert!(medallion_re.is_match(&medallion), "medallion {}", medallion);
            prop_assert!(dmv_re.is_match(&dmv), "dmv {}", dmv);
            prop_assert!(vin_re.is_match(&vin), "vin {}", vin);
        }
    }
}
