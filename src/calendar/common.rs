use anyhow::{anyhow, Result};
use reqwest::Response;
use url::Url;

const BODY_SNIPPET_CHARS: usize = 200;

/// Validates an ICS URL for security and format correctness
pub fn validate_ics_url_format(ics_url: &str) -> Result<()> {
    if ics_url.trim().is_empty() {
        return Err(anyhow!(
            "ICS URL cannot be empty. Please provide a valid calendar ICS URL."
        ));
    }

    let parsed_url = Url::parse(ics_url).map_err(|e| {
        anyhow!(
            "Invalid ICS URL format: {}. Please ensure the URL is properly formatted (e.g., https://calendar.example.com/path/calendar.ics)",
            e
        )
    })?;

    if parsed_url.scheme() != "https" {
        return Err(anyhow!(
            "ICS URL must use HTTPS protocol. Your URL starts with '{}://'.",
            parsed_url.scheme()
        ));
    }

    let domain = parsed_url.host_str().unwrap_or("");
    if domain.is_empty() {
        return Err(anyhow!(
            "ICS URL must have a valid domain name. The provided URL '{}' does not contain a valid host.",
            ics_url
        ));
    }

    if domain == "localhost"
        || domain.starts_with("127.")
        || domain.starts_with("192.168.")
        || domain.starts_with("10.")
        || domain.starts_with("172.16.")
    {
        return Err(anyhow!(
            "ICS URL cannot point to localhost or local network addresses. \
             Please use a publicly accessible calendar URL."
        ));
    }

    let path = parsed_url.path();
    if !path.to_lowercase().ends_with(".ics") && !path.contains("/calendar") {
        log::warn!(
            "ICS URL path does not look like a calendar feed (expected .ics extension or /calendar path): {}",
            ics_url
        );
    }

    Ok(())
}

/// Reads the body of `response`, turning non-2xx statuses into errors that
/// carry the status code and the start of the body.
pub async fn read_success_body(response: Response, what: &str) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| anyhow!("Failed to read {} response body: {}", what, e))?;

    if !status.is_success() {
        return Err(anyhow!(
            "{} returned HTTP {}: {}",
            what,
            status.as_u16(),
            body_snippet(&body)
        ));
    }

    Ok(body)
}

pub fn body_snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_SNIPPET_CHARS {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(BODY_SNIPPET_CHARS).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ics_url_format_valid() {
        let url = "https://calendar.google.com/calendar/ical/user/private/basic.ics";
        assert!(validate_ics_url_format(url).is_ok());
    }

    #[test]
    fn test_validate_ics_url_format_invalid_scheme() {
        let result = validate_ics_url_format("http://calendar.example.com/basic.ics");
        assert!(result.unwrap_err().to_string().contains("HTTPS"));
    }

    #[test]
    fn test_validate_ics_url_format_empty() {
        let result = validate_ics_url_format("   ");
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_validate_ics_url_format_local_addresses() {
        for url in [
            "https://localhost/calendar.ics",
            "https://127.0.0.1/calendar.ics",
            "https://192.168.1.1/calendar.ics",
            "https://10.0.0.1/calendar.ics",
        ] {
            let result = validate_ics_url_format(url);
            assert!(result.is_err(), "Should reject local URL: {}", url);
        }
    }

    #[test]
    fn test_validate_ics_url_format_malformed() {
        assert!(validate_ics_url_format("not-a-url").is_err());
        assert!(validate_ics_url_format("https://exa mple.com/calendar.ics").is_err());
    }

    #[test]
    fn test_body_snippet_truncates() {
        let long = "x".repeat(500);
        let snippet = body_snippet(&long);
        assert!(snippet.ends_with("..."));
        assert_eq!(snippet.len(), BODY_SNIPPET_CHARS + 3);
        assert_eq!(body_snippet("  short  "), "short");
    }
}
