//! Cached user profile (the `user` entry of the token store).

use serde::{Deserialize, Serialize};

/// Profile returned by the backend at login and cached alongside the token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<landacq_core::SubjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, rename = "is_admin", skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

impl UserProfile {
    /// "First Last", either half alone, then the email, then "User".
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().map(str::trim).unwrap_or_default();
        let last = self.last_name.as_deref().map(str::trim).unwrap_or_default();
        match (first.is_empty(), last.is_empty()) {
            (false, false) => format!("{first} {last}"),
            (false, true) => first.to_string(),
            (true, false) => last.to_string(),
            (true, true) => self
                .email
                .clone()
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| "User".to_string()),
        }
    }

    /// Stored avatar, or a generated initials avatar.
    pub fn avatar_url(&self) -> String {
        match self.avatar.as_deref().filter(|a| !a.is_empty()) {
            Some(url) => url.to_string(),
            None => initials_avatar(&self.display_name()),
        }
    }

    /// Whether the profile describes an administrator (chief engineer).
    pub fn is_admin(&self) -> bool {
        if self.is_admin == Some(true) {
            return true;
        }
        matches!(
            self.role.as_deref().map(str::to_lowercase).as_deref(),
            Some("chief_engineer" | "chief engineer" | "admin")
        )
    }
}

/// Display name for an optional profile ("Guest" when signed out).
pub fn display_name(profile: Option<&UserProfile>) -> String {
    profile.map_or_else(|| "Guest".to_string(), UserProfile::display_name)
}

fn initials_avatar(name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=f97316&color=fff&size=128",
        urlencoding::encode(name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(first: Option<&str>, last: Option<&str>, email: Option<&str>) -> UserProfile {
        UserProfile {
            first_name: first.map(String::from),
            last_name: last.map(String::from),
            email: email.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn display_name_falls_back_in_order() {
        assert_eq!(profile(Some("Nimal"), Some("Perera"), None).display_name(), "Nimal Perera");
        assert_eq!(profile(Some("Nimal"), None, None).display_name(), "Nimal");
        assert_eq!(profile(None, Some("Perera"), None).display_name(), "Perera");
        assert_eq!(profile(None, None, Some("n@rda.lk")).display_name(), "n@rda.lk");
        assert_eq!(profile(None, None, None).display_name(), "User");
        assert_eq!(display_name(None), "Guest");
    }

    #[test]
    fn avatar_is_generated_from_the_name() {
        let url = profile(Some("Nimal"), Some("Perera"), None).avatar_url();
        assert!(url.contains("name=Nimal%20Perera"));
    }

    #[test]
    fn admin_detection_accepts_legacy_spellings() {
        let mut p = UserProfile::default();
        assert!(!p.is_admin());
        p.role = Some("Chief Engineer".to_string());
        assert!(p.is_admin());
        p.role = Some("land_officer".to_string());
        p.is_admin = Some(true);
        assert!(p.is_admin());
    }

    #[test]
    fn parses_backend_shape() {
        let p: UserProfile = serde_json::from_str(
            r#"{"id": 4, "firstName": "Kamal", "lastName": "Silva", "email": "k@rda.lk", "role": "land_officer", "status": "approved"}"#,
        )
        .unwrap();
        assert_eq!(p.display_name(), "Kamal Silva");
        assert_eq!(p.id.unwrap().as_str(), "4");
    }
}
