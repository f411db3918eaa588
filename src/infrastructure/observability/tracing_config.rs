/// Dependencies that log every query or connection at `info` or below.
const NOISY_TARGETS: &[&str] = &["sqlx", "hyper", "reqwest", "h2"];

/// Filter and formatter selection for `init_tracing`.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    /// Used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl TracingConfig {
    /// Production keeps the service at `info`; other environments get `debug`
    /// for voxpulse and request traces. An explicit `level` replaces both.
    pub fn new(
        environment: &str,
        production: bool,
        json_format: bool,
        level: Option<&str>,
    ) -> Self {
        Self {
            environment: environment.to_string(),
            json_format,
            default_filter: service_filter(production, level),
        }
    }
}

fn service_filter(production: bool, level: Option<&str>) -> String {
    let (base, service) = match level.map(str::trim).filter(|l| !l.is_empty()) {
        Some(level) => (level, level),
        None if production => ("info", "info"),
        None => ("info", "debug"),
    };

    let mut directives = vec![
        base.to_string(),
        format!("voxpulse={service}"),
        format!("tower_http={service}"),
    ];
    directives.extend(NOISY_TARGETS.iter().map(|target| format!("{target}=warn")));
    directives.join(",")
}
