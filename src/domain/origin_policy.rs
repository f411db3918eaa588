use url::Url;

/// Decides whether a request origin may use a project with the given allow-list.
///
/// An empty list allows everything. `*.example.com` matches `example.com` and any
/// subdomain; other patterns match the hostname exactly. Loopback hosts are always
/// allowed. A missing origin is denied once a list is configured.
pub fn is_origin_allowed(origin: Option<&str>, allowed_patterns: &[String]) -> bool {
    if allowed_patterns.is_empty() {
        return true;
    }

    let Some(origin) = origin.map(str::trim).filter(|o| !o.is_empty()) else {
        return false;
    };

    let hostname = origin_hostname(origin);

    if hostname == "localhost" || hostname == "127.0.0.1" || hostname == "[::1]" {
        return true;
    }

    allowed_patterns.iter().any(|pattern| {
        let pattern = pattern.trim().to_ascii_lowercase();
        match pattern.strip_prefix("*.") {
            Some(suffix) => {
                hostname == suffix
                    || hostname
                        .strip_suffix(suffix)
                        .is_some_and(|rest| rest.ends_with('.'))
            }
            None => hostname == pattern,
        }
    })
}

/// Hostname of a full origin, or the input itself when it is a bare host.
fn origin_hostname(origin: &str) -> String {
    Url::parse(origin)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| origin.to_string())
        .to_ascii_lowercase()
}
