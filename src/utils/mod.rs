use crate::error::ProxyError;

/// A Steam ID is exactly 17 ASCII digits.
pub fn validate_steam_id(steam_id: &str) -> Result<(), ProxyError> {
    if steam_id.len() == 17 && steam_id.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ProxyError::Validation(
            "Invalid Steam ID. It should be 17 digits.".into(),
        ))
    }
}

/// A Steam Web API key is exactly 32 hex characters.
pub fn validate_api_key(api_key: &str) -> Result<(), ProxyError> {
    if api_key.len() == 32 && api_key.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(ProxyError::Validation(
            "Invalid Steam API Key format. It should be 32 hexadecimal characters.".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steam_id_must_be_exactly_17_digits() {
        assert!(validate_steam_id("76561198000000000").is_ok());
        assert!(validate_steam_id("").is_err());
        assert!(validate_steam_id("7656119800000000").is_err()); // 16 digits
        assert!(validate_steam_id("765611980000000000").is_err()); // 18 digits
        assert!(validate_steam_id("7656119800000000a").is_err());
        assert!(validate_steam_id("76561198 00000000").is_err());
    }

    #[test]
    fn api_key_must_be_exactly_32_hex_chars() {
        assert!(validate_api_key("0123456789abcdefABCDEF0123456789").is_ok());
        assert!(validate_api_key("").is_err());
        assert!(validate_api_key("0123456789abcdef").is_err());
        assert!(validate_api_key("0123456789abcdefABCDEF012345678g").is_err());
        assert!(validate_api_key("0123456789abcdefABCDEF01234567890").is_err());
    }
}
