use crate::{PasswordScheme, SchemeError};

/// Ten-prefix Israeli mobile number space: `{050..059}-XXXXXXX`.
///
/// Index `i` decomposes as `prefix = 50 + i / 10_000_000`,
/// `subscriber = i % 10_000_000`, giving a dense bijection over
/// `[0, 99_999_999]` (10 prefixes times ten million subscriber numbers).
pub struct IsraeliMobileScheme;

const PREFIXES: u64 = 10;
const NUMBERS_PER_PREFIX: u64 = 10_000_000;
const LO: u64 = 0;
const HI: u64 = PREFIXES * NUMBERS_PER_PREFIX - 1;

impl PasswordScheme for IsraeliMobileScheme {
    fn name(&self) -> &'static str {
        "israeli-mobile"
    }

    fn bounds(&self) -> (u64, u64) {
        (LO, HI)
    }

    fn index_to_password(&self, index: u64) -> Result<String, SchemeError> {
        if index < LO || index > HI {
            return Err(SchemeError::IndexOutOfBounds {
                index,
                lo: LO,
                hi: HI,
                scheme: self.name().to_string(),
            });
        }
        let prefix = 50 + index / NUMBERS_PER_PREFIX;
        let subscriber = index % NUMBERS_PER_PREFIX;
        Ok(format!("0{prefix}-{subscriber:07}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_and_last_index_render() {
        let scheme = IsraeliMobileScheme;
        assert_eq!(scheme.index_to_password(0).unwrap(), "050-0000000");
        assert_eq!(scheme.index_to_password(HI).unwrap(), "059-9999999");
    }

    #[test]
    fn prefix_boundary_rolls_over() {
        let scheme = IsraeliMobileScheme;
        assert_eq!(
            scheme.index_to_password(NUMBERS_PER_PREFIX).unwrap(),
            "051-0000000"
        );
        assert_eq!(
            scheme.index_to_password(NUMBERS_PER_PREFIX - 1).unwrap(),
            "050-9999999"
        );
    }

    #[test]
    fn out_of_bounds_index_is_rejected() {
        let scheme = IsraeliMobileScheme;
        assert!(matches!(
            scheme.index_to_password(HI + 1),
            Err(SchemeError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn sampled_indices_are_injective() {
        let scheme = IsraeliMobileScheme;
        let mut seen = std::collections::HashSet::new();
        for index in (0..=HI).step_by(999_983) {
            let password = scheme.index_to_password(index).unwrap();
            assert!(seen.insert(password), "duplicate password at index {index}");
        }
    }
}
