#[cfg(test)]
mod tests {
    use super::super::*;
    use axum::http::{HeaderMap, HeaderValue};

    #[test]
    fn test_mask_api_key() {
        let key = "abcd1234efgh5678";
        let masked = mask_api_key(key);
        assert_eq!(masked, "abcd...5678");
    }

    #[test]
    fn test_mask_short_api_key() {
        let key = "short";
        let masked = mask_api_key(key);
        assert_eq!(masked, "****");
    }

    #[test]
    fn test_extract_api_key_from_x_api_key_header() {
        let mut headers = HeaderMap::new();
        headers.insert("X-API-Key", HeaderValue::from_static("test_key_123"));

        let result = extract_api_key(&headers);
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "test_key_123");
    }

    #[test]
    fn test_extract_api_key_from_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            HeaderValue::from_static("Bearer test_token_456"),
        );

        let result = extract_api_key(&headers);
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "test_token_456");
    }

    #[test]
    fn test_extract_api_key_missing() {
        let headers = HeaderMap::new();

        let result = extract_api_key(&headers);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), AuthError::MissingApiKey));
    }

    #[test]
    fn test_extract_api_key_priority() {
        let mut headers = HeaderMap::new();
        headers.insert("X-API-Key", HeaderValue::from_static("x_api_key"));
        headers.insert(
            "Authorization",
            HeaderValue::from_static("Bearer bearer_token"),
        );

        let result = extract_api_key(&headers);
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "x_api_key");
    }

    #[test]
    fn test_parse_api_keys_maps_to_users() {
        let keys = parse_api_keys("key1:alice, key2:bob ,key3:carol");
        assert_eq!(keys.len(), 3);
        assert!(keys.values().any(|u| u == "alice"));
        assert!(keys.values().any(|u| u == "bob"));
        // Raw keys never appear in the map, only their hashes
        assert!(!keys.contains_key("key1"));
    }

    #[test]
    fn test_parse_api_keys_skips_userless_entries() {
        let keys = parse_api_keys("orphan-key,key2:bob");
        assert_eq!(keys.len(), 1);
        assert!(keys.values().any(|u| u == "bob"));
    }

    #[test]
    fn test_parse_api_keys_empty_input() {
        assert!(parse_api_keys("").is_empty());
        assert!(parse_api_keys(" , ,").is_empty());
    }

    #[test]
    fn test_authed_user_clone() {
        let user = AuthedUser {
            user_id: "alice".to_string(),
        };
        assert_eq!(user.clone().user_id, "alice");
    }
}
