use serde_json::Value;
use url::Url;

use super::Metadata;

const PLATFORMS: &[(&str, &[&str])] = &[
    ("alchemer", &["alchemer.com", "surveygizmo.com", "alchemer.eu"]),
    ("qualtrics", &["qualtrics.com"]),
    ("surveymonkey", &["surveymonkey.com"]),
    ("questionpro", &["questionpro.com"]),
    ("jotform", &["jotform.com", "jotform.pro"]),
    ("typeform", &["typeform.com"]),
    ("formstack", &["formstack.com"]),
];

/// Survey platform slug for analytics, derived from the embedding page's origin.
pub fn detect_platform(origin: Option<&str>) -> &'static str {
    let Some(origin) = origin else {
        return "unknown";
    };
    let Some(host) = Url::parse(origin)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
    else {
        return "unknown";
    };

    PLATFORMS
        .iter()
        .find(|(_, domains)| domains.iter().any(|d| host.contains(d)))
        .map(|(slug, _)| *slug)
        .unwrap_or("other")
}

/// Adds the system-injected `_origin` and `_platform` keys.
pub fn enrich_metadata(mut metadata: Metadata, origin: Option<&str>) -> Metadata {
    metadata.insert(
        "_origin".to_string(),
        origin.map_or(Value::Null, |o| Value::String(o.to_string())),
    );
    metadata.insert(
        "_platform".to_string(),
        Value::String(detect_platform(origin).to_string()),
    );
    metadata
}
