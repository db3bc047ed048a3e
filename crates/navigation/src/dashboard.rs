use serde::Serialize;

/// Dashboard a path belongs to, resolved from its prefix.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dashboard {
    ChiefEngineer,
    ProjectEngineer,
    FinancialOfficer,
    LandOfficer,
    /// Shared `/dashboard` (landowners, and anything unrecognised).
    Default,
}

impl Dashboard {
    /// Resolve by substring, checking the role dashboards in a fixed order.
    pub fn resolve(path: &str) -> Self {
        if path.contains("/ce-dashboard") {
            Dashboard::ChiefEngineer
        } else if path.contains("/pe-dashboard") {
            Dashboard::ProjectEngineer
        } else if path.contains("/fo-dashboard") {
            Dashboard::FinancialOfficer
        } else if path.contains("/lo-dashboard") {
            Dashboard::LandOfficer
        } else {
            Dashboard::Default
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Dashboard::ChiefEngineer => "/ce-dashboard",
            Dashboard::ProjectEngineer => "/pe-dashboard",
            Dashboard::FinancialOfficer => "/fo-dashboard",
            Dashboard::LandOfficer => "/lo-dashboard",
            Dashboard::Default => "/dashboard",
        }
    }
}
