use crate::error::{internal::InternalError, AppError};

/// Parses a u64 value from String
///
/// # Arguments
/// - `value` - The String to attempt to parse into `u64`
///
/// # Returns
/// - `Ok(u64)` - Successfully parsed String to `u64`
/// - `Err(AppError::InternalErr(ParseStringId))` - Failed to parse
///   the string as a u64
pub fn parse_u64_from_string(value: String) -> Result<u64, AppError> {
    let result = value
        .parse::<u64>()
        .map_err(|e| InternalError::ParseStringId { value, source: e })?;

    Ok(result)
}

/// Parses an optional stored id.
pub fn parse_optional_u64(value: Option<String>) -> Result<Option<u64>, AppError> {
    value.map(parse_u64_from_string).transpose()
}

/// Extracts a user id from a mention (`<@123>`, `<@!123>`) or a bare id.
///
/// # Returns
/// - `Some(u64)` - The referenced user id
/// - `None` - The argument is neither a user mention nor a numeric id
pub fn parse_user_mention(arg: &str) -> Option<u64> {
    let arg = arg.trim();
    let inner = arg
        .strip_prefix("<@")
        .and_then(|rest| rest.strip_suffix('>'))
        .map(|rest| rest.strip_prefix('!').unwrap_or(rest))
        .unwrap_or(arg);

    inner.parse::<u64>().ok().filter(|id| *id != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stored_ids() {
        assert_eq!(parse_u64_from_string("42".to_string()).unwrap(), 42);
        assert!(matches!(
            parse_u64_from_string("abc".to_string()),
            Err(AppError::InternalErr(InternalError::ParseStringId { .. }))
        ));
        assert_eq!(parse_optional_u64(None).unwrap(), None);
        assert_eq!(parse_optional_u64(Some("7".to_string())).unwrap(), Some(7));
    }

    #[test]
    fn parses_mentions() {
        assert_eq!(parse_user_mention("<@123>"), Some(123));
        assert_eq!(parse_user_mention("<@!123>"), Some(123));
        assert_eq!(parse_user_mention("123"), Some(123));
        assert_eq!(parse_user_mention("<@&123>"), None);
        assert_eq!(parse_user_mention("someone"), None);
        assert_eq!(parse_user_mention("0"), None);
    }
}
