//! URL helpers shared by resolvers, the collector and request validation.

use url::Url;

/// Errors raised when a user-supplied URL is not acceptable.
#[derive(Debug, thiserror::Error)]
pub enum UrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Returns the network location of `input`: the lowercase host, followed by
/// `:port` when the URL carries a non-default port.
///
/// Credentials are never part of the result. Unparseable input yields an empty
/// string, which callers treat as "unknown domain".
///
/// # Examples
///
/// ```ignore
/// assert_eq!(domain_of("https://Stake.com/abc"), "stake.com");
/// assert_eq!(domain_of("http://127.0.0.1:8080/x"), "127.0.0.1:8080");
/// assert_eq!(domain_of("not a url"), "");
/// ```
pub fn domain_of(input: &str) -> String {
    let Ok(url) = Url::parse(input) else {
        return String::new();
    };

    let Some(host) = url.host_str() else {
        return String::new();
    };

    let host = host.to_ascii_lowercase();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    }
}

/// Parses and checks a URL coming from an API request or CLI argument.
///
/// # Errors
///
/// Returns [`UrlError::InvalidFormat`] for malformed input,
/// [`UrlError::UnsupportedProtocol`] for non-HTTP(S) schemes and
/// [`UrlError::MissingHost`] when the URL has no host.
pub fn parse_http_url(input: &str) -> Result<Url, UrlError> {
    let url = Url::parse(input.trim()).map_err(|e| UrlError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}
