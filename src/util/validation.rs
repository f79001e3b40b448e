use once_cell::sync::Lazy;
use regex::Regex;

// A single trailing newline is tolerated, like `$` does in PCRE.
#[allow(clippy::expect_used)]
static PLACEHOLDER_ADDRESS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@example\.com\n?$").expect("compile placeholder address regex"));

#[allow(clippy::expect_used)]
static TABLE_AFFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_]*$").expect("compile table affix regex"));

/// Whether the address still uses the `example.com` domain shipped
/// with the default configuration.
///
/// The match is case-sensitive and anchored to the end of the address,
/// so `admin@example.com.au`, `admin@EXAMPLE.COM` or subdomains like
/// `noreply@mail.example.com` are not placeholders.
pub fn is_placeholder_address(email: &str) -> bool {
    PLACEHOLDER_ADDRESS_REGEX.is_match(email)
}

/// Table prefixes and suffixes end up inside a quoted SQL identifier,
/// so only lower-case identifier characters are allowed. Postgres folds
/// the unquoted names the tracker created its tables with to lower case.
/// Empty is fine.
pub fn is_valid_table_affix(affix: &str) -> bool {
    TABLE_AFFIX_REGEX.is_match(affix)
}

pub fn is_postgres_url(input: &str) -> bool {
    url::Url::parse(input)
        .is_ok_and(|url| matches!(url.scheme(), "postgres" | "postgresql"))
}
