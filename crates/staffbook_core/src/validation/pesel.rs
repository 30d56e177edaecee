//! PESEL check-digit verification.

const WEIGHTS: [u32; 10] = [1, 3, 7, 9, 1, 3, 7, 9, 1, 3];

/// Returns whether the 11th digit matches the weighted checksum of the first ten.
///
/// Inputs that are not exactly eleven ASCII digits never pass.
pub fn is_pesel_checksum_valid(pesel: &str) -> bool {
    let digits: Vec<u32> = match pesel.chars().map(|c| c.to_digit(10)).collect() {
        Some(digits) => digits,
        None => return false,
    };
    if digits.len() != 11 || !pesel.is_ascii() {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .zip(WEIGHTS.iter())
        .map(|(digit, weight)| digit * weight)
        .sum();
    let check = (10 - sum % 10) % 10;
    check == digits[10]
}

#[cfg(test)]
mod tests {
    use super::is_pesel_checksum_valid;

    #[test]
    fn accepts_known_valid_numbers() {
        for pesel in ["72030663621", "99010112373", "44051401458", "02270803624"] {
            assert!(is_pesel_checksum_valid(pesel), "{pesel} should pass");
        }
    }

    #[test]
    fn rejects_wrong_check_digit() {
        assert!(!is_pesel_checksum_valid("72030663622"));
        assert!(!is_pesel_checksum_valid("02270803628"));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(!is_pesel_checksum_valid(""));
        assert!(!is_pesel_checksum_valid("7203066362"));
        assert!(!is_pesel_checksum_valid("7203066362a"));
    }
}
