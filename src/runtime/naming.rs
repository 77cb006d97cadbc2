//! Docker naming conventions kept out of the translation logic.

/// Name reported when a container cannot be inspected while handling an event.
pub const PLACEHOLDER_NAME: &str = "<name>";

const NAME_SEPARATOR: char = '/';

/// Strips the separator Docker prepends to every container name.
pub fn display_name(raw: &str) -> &str {
    raw.strip_prefix(NAME_SEPARATOR).unwrap_or(raw)
}
