use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanTier {
    Free,
    Freelancer,
    Pro,
    Enterprise,
}

impl PlanTier {
    /// Unknown keys fall back to the free tier.
    pub fn from_key(key: &str) -> Self {
        match key.to_ascii_lowercase().as_str() {
            "freelancer" => PlanTier::Freelancer,
            "pro" => PlanTier::Pro,
            "enterprise" => PlanTier::Enterprise,
            _ => PlanTier::Free,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Freelancer => "freelancer",
            PlanTier::Pro => "pro",
            PlanTier::Enterprise => "enterprise",
        }
    }

    pub fn plan(&self) -> &'static Plan {
        match self {
            PlanTier::Free => &FREE,
            PlanTier::Freelancer => &FREELANCER,
            PlanTier::Pro => &PRO,
            PlanTier::Enterprise => &ENTERPRISE,
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Api,
}

/// Limits attached to a plan tier. `None` means unlimited / unrestricted.
#[derive(Debug, PartialEq)]
pub struct Plan {
    pub tier: PlanTier,
    pub max_responses: u64,
    pub max_projects: Option<u32>,
    pub max_duration_secs: u32,
    pub languages: Option<&'static [&'static str]>,
    pub export_formats: &'static [ExportFormat],
    pub batch_enabled: bool,
    /// Whether the widget shows the "powered by" badge.
    pub show_branding: bool,
}

static FREE: Plan = Plan {
    tier: PlanTier::Free,
    max_responses: 100,
    max_projects: Some(2),
    max_duration_secs: 90,
    languages: Some(&["es"]),
    export_formats: &[ExportFormat::Csv],
    batch_enabled: false,
    show_branding: true,
};

static FREELANCER: Plan = Plan {
    tier: PlanTier::Freelancer,
    max_responses: 1_000,
    max_projects: Some(10),
    max_duration_secs: 180,
    languages: Some(&["es", "en", "pt", "fr", "de", "it", "ja", "ko", "zh"]),
    export_formats: &[ExportFormat::Csv, ExportFormat::Xlsx],
    batch_enabled: true,
    show_branding: false,
};

static PRO: Plan = Plan {
    tier: PlanTier::Pro,
    max_responses: 10_000,
    max_projects: None,
    max_duration_secs: 300,
    languages: None,
    export_formats: &[ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Api],
    batch_enabled: true,
    show_branding: false,
};

static ENTERPRISE: Plan = Plan {
    tier: PlanTier::Enterprise,
    max_responses: 50_000,
    max_projects: None,
    max_duration_secs: 600,
    languages: None,
    export_formats: &[ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Api],
    batch_enabled: true,
    show_branding: false,
};

impl Plan {
    pub fn allows_language(&self, code: &str) -> bool {
        match self.languages {
            Some(codes) => codes.contains(&code),
            None => true,
        }
    }

    pub fn allows_duration(&self, seconds: u32) -> bool {
        seconds <= self.max_duration_secs
    }
}
