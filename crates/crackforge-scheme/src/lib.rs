//! Pluggable password-space enumeration.
//!
//! A [`PasswordScheme`] maps a dense `u64` index onto a plaintext candidate.
//! Workers and the master agree on a scheme purely by name (`password_scheme`
//! in the wire protocol); this crate is the shared registry both sides
//! dispatch through.

mod israeli_mobile;

pub use israeli_mobile::IsraeliMobileScheme;

/// Errors produced by a [`PasswordScheme`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum SchemeError {
    /// The requested index falls outside the scheme's `bounds()`.
    #[error("index {index} out of bounds [{lo}, {hi}] for scheme {scheme:?}")]
    IndexOutOfBounds {
        /// Offending index.
        index: u64,
        /// Scheme's inclusive lower bound.
        lo: u64,
        /// Scheme's inclusive upper bound.
        hi: u64,
        /// Name of the scheme that rejected the index.
        scheme: String,
    },
    /// `scheme_by_name` was asked for an identifier with no registered
    /// implementation.
    #[error("unknown password scheme: {0:?}")]
    UnknownScheme(String),
}

/// A deterministic, injective mapping from index to plaintext candidate over
/// a bounded keyspace. Implementations must be pure and side-effect free:
/// the same index always yields the same password, and distinct indices in
/// range always yield distinct passwords, so a FOUND result is unambiguous.
pub trait PasswordScheme: Send + Sync {
    /// Stable identifier used in the wire protocol's `password_scheme` field.
    fn name(&self) -> &'static str;

    /// Inclusive `[lo, hi]` bounds of this scheme's keyspace.
    fn bounds(&self) -> (u64, u64);

    /// Render the candidate password at `index`.
    ///
    /// # Errors
    /// Returns [`SchemeError::IndexOutOfBounds`] if `index` falls outside
    /// `bounds()`.
    fn index_to_password(&self, index: u64) -> Result<String, SchemeError>;
}

/// Look up a registered scheme by its wire-protocol name.
pub fn scheme_by_name(name: &str) -> Result<Box<dyn PasswordScheme>, SchemeError> {
    match name {
        "israeli-mobile" => Ok(Box::new(IsraeliMobileScheme)),
        other => Err(SchemeError::UnknownScheme(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_scheme_is_rejected() {
        assert!(matches!(
            scheme_by_name("does-not-exist"),
            Err(SchemeError::UnknownScheme(_))
        ));
    }

    #[test]
    fn registered_scheme_resolves() {
        let scheme = scheme_by_name("israeli-mobile").unwrap();
        assert_eq!(scheme.name(), "israeli-mobile");
    }
}
