use serde::{Deserialize, Serialize};

/// Role of an authenticated user.
///
/// The set is closed: every dashboard, guard and sidebar is keyed on one of
/// these five values. Wire names match the backend's `role` / `type` claims.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    ChiefEngineer,
    ProjectEngineer,
    LandOfficer,
    FinancialOfficer,
    Landowner,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::ChiefEngineer,
        Role::ProjectEngineer,
        Role::LandOfficer,
        Role::FinancialOfficer,
        Role::Landowner,
    ];

    /// Staff roles (everyone except landowners).
    pub const OFFICERS: [Role; 4] = [
        Role::ChiefEngineer,
        Role::ProjectEngineer,
        Role::FinancialOfficer,
        Role::LandOfficer,
    ];

    /// Parse a claim value. Unknown strings yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "chief_engineer" => Some(Role::ChiefEngineer),
            "project_engineer" => Some(Role::ProjectEngineer),
            "land_officer" => Some(Role::LandOfficer),
            "financial_officer" => Some(Role::FinancialOfficer),
            "landowner" => Some(Role::Landowner),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::ChiefEngineer => "chief_engineer",
            Role::ProjectEngineer => "project_engineer",
            Role::LandOfficer => "land_officer",
            Role::FinancialOfficer => "financial_officer",
            Role::Landowner => "landowner",
        }
    }

    /// Human-readable title shown in the sidebar header.
    pub fn title(&self) -> &'static str {
        match self {
            Role::ChiefEngineer => "Chief Engineer",
            Role::ProjectEngineer => "Project Engineer",
            Role::LandOfficer => "Land Officer",
            Role::FinancialOfficer => "Financial Officer",
            Role::Landowner => "Landowner",
        }
    }

    /// Landing path after login.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::ChiefEngineer => "/ce-dashboard",
            Role::ProjectEngineer => "/pe-dashboard",
            Role::LandOfficer => "/lo-dashboard",
            Role::FinancialOfficer => "/fo-dashboard",
            Role::Landowner => "/dashboard",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_through_parse() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("admin"), None);
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let json = serde_json::to_string(&Role::FinancialOfficer).unwrap();
        assert_eq!(json, "\"financial_officer\"");
    }
}
