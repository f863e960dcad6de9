//! Centralized validation and helper functions.

use crate::core::hashes::HashKind;

/// Maximum length of a rom or game name
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum number of roms allowed in a single game
pub const MAX_ROMS_PER_GAME: usize = 100_000;

/// Precondition violations, always returned to the immediate caller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("hash kind {0} is not present in the supplied hashes")]
    MissingHashKind(HashKind),
    #[error("invalid {kind} digest length: {length} bytes")]
    InvalidDigestLength { kind: HashKind, length: usize },
    #[error("invalid digest: {0} hex characters does not match any hash kind")]
    UnknownDigestLength(usize),
    #[error("invalid digest: contains non-hex characters")]
    InvalidDigestCharacters,
    #[error("expected a {expected} digest, found a {found} digest")]
    WrongDigestKind { expected: HashKind, found: HashKind },
    #[error("empty name")]
    EmptyName,
    #[error("name too long: exceeds {MAX_NAME_LENGTH} characters")]
    NameTooLong,
    #[error("invalid name '{0}': contains path traversal or control characters")]
    InvalidName(String),
    #[error("too many roms: exceeds maximum of {MAX_ROMS_PER_GAME}")]
    TooManyRoms,
}

/// Check whether a string is hex of the width of some digest kind.
///
/// # Examples
///
/// ```
/// use romcheck::utils::validation::is_valid_digest;
///
/// assert!(is_valid_digest("deadbeef"));
/// assert!(is_valid_digest("d41d8cd98f00b204e9800998ecf8427e"));
/// assert!(!is_valid_digest("not-a-digest"));
/// assert!(!is_valid_digest("deadbee")); // 7 chars
/// ```
#[must_use]
pub fn is_valid_digest(s: &str) -> bool {
    parse_digest(s).is_ok()
}

/// Parse a hex digest, inferring its kind from the length.
///
/// Leading and trailing whitespace and a `0x` prefix are ignored.
///
/// # Errors
///
/// Returns `ValidationError::InvalidDigestCharacters` for non-hex input and
/// `ValidationError::UnknownDigestLength` if the length fits no kind.
pub fn parse_digest(s: &str) -> Result<(HashKind, Vec<u8>), ValidationError> {
    let trimmed = s.trim();
    let hex_str = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if !hex_str.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::InvalidDigestCharacters);
    }

    let kind = HashKind::ALL
        .into_iter()
        .find(|k| k.size() * 2 == hex_str.len())
        .ok_or(ValidationError::UnknownDigestLength(hex_str.len()))?;

    let bytes = hex::decode(hex_str).map_err(|_| ValidationError::InvalidDigestCharacters)?;
    Ok((kind, bytes))
}

/// Validate a rom or game name before it is used to address a file.
///
/// Rejects empty names, overlong names, control characters and anything
/// that could escape the game's directory.
///
/// # Errors
///
/// Returns `ValidationError::EmptyName`, `ValidationError::NameTooLong` or
/// `ValidationError::InvalidName`.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong);
    }

    let has_traversal = name
        .split(['/', '\\'])
        .any(|component| component == ".." || component == ".");
    if has_traversal || name.starts_with('/') || name.starts_with('\\') {
        return Err(ValidationError::InvalidName(name.to_string()));
    }

    if name.chars().any(char::is_control) {
        return Err(ValidationError::InvalidName(name.to_string()));
    }

    Ok(())
}

/// Check if adding another rom would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new rom.
///
/// # Errors
///
/// Returns `ValidationError::TooManyRoms` if the limit is reached.
pub fn check_rom_limit(count: usize) -> Result<(), ValidationError> {
    if count >= MAX_ROMS_PER_GAME {
        Err(ValidationError::TooManyRoms)
    } else {
        Ok(())
    }
}
