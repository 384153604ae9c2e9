//! Email address format checks.

/// Maximum total length of an address (RFC 5321).
const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;
const MAX_DOMAIN_LEN: usize = 253;

/// Validate the format of an email address.
///
/// This is a structural check only: one `@`, a bounded local part, and a
/// dotted domain made of hostname characters. The error is a short reason
/// suitable for embedding in a field message.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.len() > MAX_EMAIL_LEN {
        return Err(format!("too long (max {MAX_EMAIL_LEN} characters)"));
    }

    let (local, domain) = match email.split_once('@') {
        Some((local, domain)) if !domain.contains('@') => (local, domain),
        _ => return Err("must contain exactly one @ symbol".to_string()),
    };

    if local.is_empty() || local.len() > MAX_LOCAL_LEN {
        return Err(format!("local part must be 1-{MAX_LOCAL_LEN} characters"));
    }

    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
        return Err(format!("domain must be 1-{MAX_DOMAIN_LEN} characters"));
    }

    if !domain.contains('.') {
        return Err("domain must contain at least one dot".to_string());
    }

    if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
        return Err("domain has an empty label".to_string());
    }

    if !local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '+'))
    {
        return Err("local part contains invalid characters".to_string());
    }

    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err("domain contains invalid characters".to_string());
    }

    Ok(())
}
