pub mod category;
pub mod product;

/// Parse a record identifier received as a path or form value.
///
/// Identifiers are positive integers; anything else is treated as malformed.
pub fn parse_identifier(raw: &str) -> Option<i32> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Some(id),
        _ => None,
    }
}
