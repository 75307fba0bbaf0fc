//! Ecuadorian national ID (cédula) check-digit validation.
//!
//! A cédula is a 10-digit string whose last digit verifies the first nine.
//! Weights [2,1,2,1,2,1,2,1,2] are applied positionally, products above 9
//! are reduced by subtracting 9, and the expected check digit is
//! `(10 - sum % 10) % 10`.

/// Whether the field is required at the call site.
///
/// The same validator serves the patient form (cédula mandatory) and the
/// profile form (cédula optional); only the empty-input classification
/// differs between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Mandatory,
    Optional,
}

/// Classification of a cédula input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CedulaCheck {
    /// Ten digits with a matching check digit.
    Valid,
    /// Empty in a mandatory context.
    Empty,
    /// Empty in an optional context; treated as valid-but-absent.
    EmptyOptional,
    /// Trimmed input is not exactly 10 characters.
    WrongLength,
    /// Contains a non-digit character.
    NonNumeric,
    /// Well-formed but the check digit does not match.
    ChecksumMismatch,
}

impl CedulaCheck {
    /// True when the input should not block submission.
    pub fn is_acceptable(&self) -> bool {
        matches!(self, CedulaCheck::Valid | CedulaCheck::EmptyOptional)
    }
}

const WEIGHTS: [u8; 9] = [2, 1, 2, 1, 2, 1, 2, 1, 2];

/// Computes the expected check digit for the first nine digits.
///
/// Pure function of its input; the weighted sum reduces each product above 9
/// by 9 (equivalent to summing the product's digits, since weights are 1 or
/// 2 and digits 0-9).
pub fn check_digit(digits: &[u8; 9]) -> u8 {
    let sum: u32 = digits
        .iter()
        .zip(WEIGHTS)
        .map(|(&d, w)| {
            let product = u32::from(d) * u32::from(w);
            if product > 9 {
                product - 9
            } else {
                product
            }
        })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

/// Validates a cédula string, classifying rather than erroring.
///
/// Input is trimmed first. Length and digit checks run before any checksum
/// computation, so malformed input never reaches `check_digit`.
pub fn validate_cedula(input: &str, requirement: Requirement) -> CedulaCheck {
    let value = input.trim();

    if value.is_empty() {
        return match requirement {
            Requirement::Mandatory => CedulaCheck::Empty,
            Requirement::Optional => CedulaCheck::EmptyOptional,
        };
    }

    if value.chars().count() != 10 {
        return CedulaCheck::WrongLength;
    }

    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return CedulaCheck::NonNumeric;
    }

    let bytes = value.as_bytes();
    let mut digits = [0u8; 9];
    for (slot, b) in digits.iter_mut().zip(bytes) {
        *slot = b - b'0';
    }

    if check_digit(&digits) == bytes[9] - b'0' {
        CedulaCheck::Valid
    } else {
        CedulaCheck::ChecksumMismatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Independent re-derivation of the weighted-sum rule, kept deliberately
    // naive so the production implementation is checked against it.
    fn expected_check_digit_naive(cedula: &str) -> u8 {
        let weights = [2u32, 1, 2, 1, 2, 1, 2, 1, 2];
        let mut sum = 0u32;
        for (i, c) in cedula.chars().take(9).enumerate() {
            let mut product = c.to_digit(10).unwrap() * weights[i];
            if product > 9 {
                product -= 9;
            }
            sum += product;
        }
        if sum % 10 == 0 {
            0
        } else {
            (10 - sum % 10) as u8
        }
    }

    #[test]
    fn test_known_valid_cedulas() {
        // 1710034065 is the canonical published sample; 0123456782 is
        // hand-computed (weighted sum 38, check digit 2).
        for sample in ["1710034065", "0123456782"] {
            assert_eq!(
                validate_cedula(sample, Requirement::Mandatory),
                CedulaCheck::Valid,
                "{sample} should be valid"
            );
        }
    }

    #[test]
    fn test_checksum_mismatch() {
        assert_eq!(
            validate_cedula("0123456789", Requirement::Mandatory),
            CedulaCheck::ChecksumMismatch
        );
        assert_eq!(
            validate_cedula("1710034066", Requirement::Optional),
            CedulaCheck::ChecksumMismatch
        );
    }

    #[test]
    fn test_short_or_non_numeric_never_reaches_checksum() {
        assert_eq!(
            validate_cedula("012345678", Requirement::Mandatory),
            CedulaCheck::WrongLength
        );
        assert_eq!(
            validate_cedula("01234567890", Requirement::Mandatory),
            CedulaCheck::WrongLength
        );
        assert_eq!(
            validate_cedula("012345678x", Requirement::Mandatory),
            CedulaCheck::NonNumeric
        );
    }

    #[test]
    fn test_empty_classification_depends_on_requirement() {
        assert_eq!(
            validate_cedula("   ", Requirement::Mandatory),
            CedulaCheck::Empty
        );
        assert_eq!(
            validate_cedula("", Requirement::Optional),
            CedulaCheck::EmptyOptional
        );
        assert!(validate_cedula("", Requirement::Optional).is_acceptable());
        assert!(!validate_cedula("", Requirement::Mandatory).is_acceptable());
    }

    #[test]
    fn test_input_is_trimmed() {
        assert_eq!(
            validate_cedula("  1710034065  ", Requirement::Mandatory),
            CedulaCheck::Valid
        );
    }

    #[test]
    fn test_subtraction_and_times_nine_formulas_agree() {
        // The repository this logic was consolidated from carried two check
        // digit formulas: (10 - s % 10) % 10 and (s * 9) % 10. They are
        // congruent mod 10 (9s == -s), so every possible weighted sum yields
        // the same digit. Max sum for nine reduced products is 81.
        for s in 0u32..=81 {
            assert_eq!((10 - s % 10) % 10, (s * 9) % 10, "sum {s}");
        }
    }

    proptest! {
        #[test]
        fn prop_matches_naive_reimplementation(digits in proptest::collection::vec(0u32..10, 10)) {
            let cedula: String = digits.iter().map(|d| char::from_digit(*d, 10).unwrap()).collect();
            let expected = expected_check_digit_naive(&cedula);
            let outcome = validate_cedula(&cedula, Requirement::Mandatory);
            if expected == digits[9] as u8 {
                prop_assert_eq!(outcome, CedulaCheck::Valid);
            } else {
                prop_assert_eq!(outcome, CedulaCheck::ChecksumMismatch);
            }
        }

        #[test]
        fn prop_times_nine_variant_classifies_identically(digits in proptest::collection::vec(0u32..10, 10)) {
            let cedula: String = digits.iter().map(|d| char::from_digit(*d, 10).unwrap()).collect();
            let weights = [2u32, 1, 2, 1, 2, 1, 2, 1, 2];
            let sum: u32 = digits[..9]
                .iter()
                .zip(weights)
                .map(|(&d, w)| { let p = d * w; if p > 9 { p - 9 } else { p } })
                .sum();
            let variant_valid = (sum * 9) % 10 == digits[9];
            let outcome = validate_cedula(&cedula, Requirement::Mandatory);
            prop_assert_eq!(variant_valid, outcome == CedulaCheck::Valid);
        }
    }
}
