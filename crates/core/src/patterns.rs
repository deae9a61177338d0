//! Named pattern registry and password strength scoring.

use std::sync::LazyLock;

use regex::Regex;

use crate::field::Pattern;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));
static EMAIL_STRICT: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
});
static URL: LazyLock<Regex> = LazyLock::new(|| compile(r"^https?://.+"));
static PHONE: LazyLock<Regex> = LazyLock::new(|| compile(r"^\+?[\d\s()-]+$"));
static ALPHANUMERIC: LazyLock<Regex> = LazyLock::new(|| compile(r"^[a-zA-Z0-9]+$"));
static NUMERIC: LazyLock<Regex> = LazyLock::new(|| compile(r"^\d+$"));
static ALPHA: LazyLock<Regex> = LazyLock::new(|| compile(r"^[a-zA-Z]+$"));

fn compile(expression: &str) -> Regex {
    Regex::new(expression).expect("registry pattern compiles")
}

/// Look up a named pattern in the registry.
pub fn lookup(name: &str) -> Option<&'static Regex> {
    match name {
        "email" => Some(&EMAIL),
        "email_strict" => Some(&EMAIL_STRICT),
        "url" => Some(&URL),
        "phone" => Some(&PHONE),
        "alphanumeric" => Some(&ALPHANUMERIC),
        "numeric" => Some(&NUMERIC),
        "alpha" => Some(&ALPHA),
        _ => None,
    }
}

/// Resolve a pattern rule to a compiled expression. A name missing from
/// the registry is compiled as a literal expression.
pub fn resolve(pattern: &Pattern) -> Result<Regex, regex::Error> {
    match pattern {
        Pattern::Literal(expression) => Ok(expression.clone()),
        Pattern::Named(name) => match lookup(name) {
            Some(expression) => Ok(expression.clone()),
            None => Regex::new(name),
        },
    }
}

/// Password strength bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

/// Score a password on lowercase, uppercase, digit, special character,
/// and length of at least 8: two or fewer criteria is weak, three is
/// medium, more is strong.
pub fn password_strength(password: &str) -> PasswordStrength {
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| "!@#$%^&*(),.?\":{}|<>".contains(c));
    let long_enough = password.chars().count() >= 8;

    let score = [has_lower, has_upper, has_digit, has_special, long_enough]
        .into_iter()
        .filter(|met| *met)
        .count();

    match score {
        0..=2 => PasswordStrength::Weak,
        3 => PasswordStrength::Medium,
        _ => PasswordStrength::Strong,
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
