use lazy_static::lazy_static;
use regex::Regex;

/// A secret-shaped assignment such as `api_key = "..."`.
pub struct SecretPattern {
    pub name: &'static str,
    pub regex: Regex,
    pub message: &'static str,
}

lazy_static! {
    pub static ref SECRET_PATTERNS: Vec<SecretPattern> = vec![
        SecretPattern {
            name: "api_key",
            regex: Regex::new(r#"(?i)api[_-]?key\s*[:=]\s*["'][^"']+["']"#).unwrap(),
            message: "API key detected",
        },
        SecretPattern {
            name: "password",
            regex: Regex::new(r#"(?i)password\s*[:=]\s*["'][^"']+["']"#).unwrap(),
            message: "Hardcoded password detected",
        },
        SecretPattern {
            name: "secret",
            regex: Regex::new(r#"(?i)secret\s*[:=]\s*["'][^"']+["']"#).unwrap(),
            message: "Secret detected",
        },
        SecretPattern {
            name: "token",
            regex: Regex::new(r#"(?i)token\s*[:=]\s*["'][^"']+["']"#).unwrap(),
            message: "Token detected",
        },
    ];
}
