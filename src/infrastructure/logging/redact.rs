/// Mask a credential for logging, keeping a short prefix for identification.
///
/// Secrets of eight characters or fewer are masked entirely.
pub fn redact_secret(secret: &str) -> String {
    if secret.chars().count() <= 8 {
        return "[REDACTED]".to_string();
    }

    let visible: String = secret.chars().take(4).collect();
    format!("{visible}...[REDACTED]")
}

/// Replace every occurrence of `secret` in `message` with its redacted form.
///
/// Upstream error bodies sometimes echo the submitted key back.
pub fn scrub_secret(message: &str, secret: &str) -> String {
    if secret.is_empty() {
        return message.to_string();
    }

    message.replace(secret, &redact_secret(secret))
}
