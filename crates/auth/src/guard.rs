use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{Role, Session, TokenClaims};

/// Where unauthenticated navigation is sent.
pub const LOGIN_PATH: &str = "/login";

/// Where authenticated but under-privileged navigation is sent.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Gate wrapping a protected region of the navigation tree.
///
/// This is a UX gate only: it hides screens a user cannot use. It runs on
/// unverified claims and must never be mistaken for access control; the
/// backend re-checks every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    allowed: Vec<Role>,
}

/// Outcome of evaluating a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the wrapped content.
    Allow(TokenClaims),
    /// No live session: send to the login entry point.
    RedirectToLogin,
    /// Live session without an accepted role.
    RedirectToUnauthorized,
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow(_))
    }

    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            GuardDecision::Allow(_) => None,
            GuardDecision::RedirectToLogin => Some(LOGIN_PATH),
            GuardDecision::RedirectToUnauthorized => Some(UNAUTHORIZED_PATH),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    Expired,
    RoleNotAllowed,
}

/// Detailed reason why a guard denied navigation.
#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

/// Debuggable account of a guard decision.
#[derive(Debug, Clone, Serialize)]
pub struct GuardExplanation {
    /// Roles the guard accepts (empty: any authenticated role).
    pub required_roles: Vec<String>,
    pub granted: bool,
    pub reason: String,
    /// Role claimed by the session, as issued.
    pub claimed_role: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub denial_reason: Option<DenialReason>,
}

impl RouteGuard {
    /// Guard accepting the given roles. An empty list accepts any
    /// authenticated session.
    pub fn new(allowed: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    pub fn for_role(role: Role) -> Self {
        Self::new([role])
    }

    pub fn chief_engineer() -> Self {
        Self::for_role(Role::ChiefEngineer)
    }

    pub fn project_engineer() -> Self {
        Self::for_role(Role::ProjectEngineer)
    }

    pub fn financial_officer() -> Self {
        Self::for_role(Role::FinancialOfficer)
    }

    pub fn land_officer() -> Self {
        Self::for_role(Role::LandOfficer)
    }

    /// Any staff role.
    pub fn any_officer() -> Self {
        Self::new(Role::OFFICERS)
    }

    /// Any live session, whatever its role.
    pub fn authenticated() -> Self {
        Self::new([])
    }

    pub fn allowed(&self) -> &[Role] {
        &self.allowed
    }

    /// Evaluate against the current session at `now`.
    ///
    /// Expiry is compared at call time only; nothing is refreshed and stored
    /// state is never touched.
    pub fn evaluate(&self, session: Option<&Session>, now: DateTime<Utc>) -> GuardDecision {
        let decision = match self.check(session.map(|s| &s.claims), now) {
            Ok(claims) => GuardDecision::Allow(claims.clone()),
            Err(DenialKind::Unauthenticated | DenialKind::Expired) => GuardDecision::RedirectToLogin,
            Err(DenialKind::RoleNotAllowed) => GuardDecision::RedirectToUnauthorized,
        };

        if let Some(target) = decision.redirect_target() {
            tracing::debug!(target_path = target, "guard redirected navigation");
        }
        decision
    }

    /// Evaluate straight from a stored token (decoded without verification).
    pub fn evaluate_token(&self, token: Option<&str>, now: DateTime<Utc>) -> GuardDecision {
        let session = token.and_then(Session::from_token);
        self.evaluate(session.as_ref(), now)
    }

    /// Explain why navigation would be allowed or denied.
    pub fn explain(&self, session: Option<&Session>, now: DateTime<Utc>) -> GuardExplanation {
        let required_roles: Vec<String> = self.allowed.iter().map(|r| r.as_str().to_string()).collect();
        let claims = session.map(|s| &s.claims);
        let claimed_role = claims.and_then(|c| c.raw_role.clone());
        let expires_at = claims.map(|c| c.expires_at);

        let (granted, reason, denial_reason) = match self.check(claims, now) {
            Ok(c) => {
                let reason = match (&c.role, self.allowed.is_empty()) {
                    (_, true) => "Session is live; route accepts any authenticated role".to_string(),
                    (Some(role), false) => format!("Role '{role}' is accepted by this route"),
                    (None, false) => "Session is live".to_string(),
                };
                (true, reason, None)
            }
            Err(DenialKind::Unauthenticated) => (
                false,
                "No decodable session token is stored".to_string(),
                Some(DenialReason {
                    kind: DenialKind::Unauthenticated,
                    message: "Missing or malformed bearer token".to_string(),
                    suggestions: vec![format!("Sign in at {LOGIN_PATH}")],
                }),
            ),
            Err(DenialKind::Expired) => (
                false,
                format!(
                    "Session expired at {}",
                    expires_at.map(|t| t.to_rfc3339()).unwrap_or_default()
                ),
                Some(DenialReason {
                    kind: DenialKind::Expired,
                    message: "Token 'exp' claim is not in the future".to_string(),
                    suggestions: vec![format!("Sign in again at {LOGIN_PATH}")],
                }),
            ),
            Err(DenialKind::RoleNotAllowed) => (
                false,
                format!(
                    "Role {:?} is not one of {:?}",
                    claimed_role.as_deref().unwrap_or("<none>"),
                    required_roles
                ),
                Some(DenialReason {
                    kind: DenialKind::RoleNotAllowed,
                    message: "Session role is not accepted by this route".to_string(),
                    suggestions: vec![
                        "Open the dashboard for your own role".to_string(),
                        "Ask a Chief Engineer to review your account role".to_string(),
                    ],
                }),
            ),
        };

        GuardExplanation {
            required_roles,
            granted,
            reason,
            claimed_role,
            expires_at,
            denial_reason,
        }
    }

    fn check<'a>(
        &self,
        claims: Option<&'a TokenClaims>,
        now: DateTime<Utc>,
    ) -> Result<&'a TokenClaims, DenialKind> {
        let claims = claims.ok_or(DenialKind::Unauthenticated)?;
        if claims.is_expired(now) {
            return Err(DenialKind::Expired);
        }
        if self.allowed.is_empty() {
            return Ok(claims);
        }
        match claims.role {
            Some(role) if self.allowed.contains(&role) => Ok(claims),
            _ => Err(DenialKind::RoleNotAllowed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn session(role: Option<Role>, raw: &str, expires_in: Duration) -> Session {
        Session {
            token: "t".to_string(),
            claims: TokenClaims {
                subject: None,
                role,
                raw_role: Some(raw.to_string()),
                issued_at: None,
                expires_at: Utc::now() + expires_in,
            },
        }
    }

    #[test]
    fn missing_session_redirects_to_login() {
        let decision = RouteGuard::chief_engineer().evaluate(None, Utc::now());
        assert_eq!(decision, GuardDecision::RedirectToLogin);
        assert_eq!(decision.redirect_target(), Some("/login"));
    }

    #[test]
    fn expired_session_redirects_to_login_even_with_matching_role() {
        let s = session(Some(Role::ChiefEngineer), "chief_engineer", Duration::seconds(-5));
        let decision = RouteGuard::chief_engineer().evaluate(Some(&s), Utc::now());
        assert_eq!(decision, GuardDecision::RedirectToLogin);
    }

    #[test]
    fn wrong_role_redirects_to_unauthorized() {
        let s = session(Some(Role::Landowner), "landowner", Duration::hours(1));
        let decision = RouteGuard::any_officer().evaluate(Some(&s), Utc::now());
        assert_eq!(decision.redirect_target(), Some("/unauthorized"));
    }

    #[test]
    fn unknown_role_passes_only_open_guards() {
        let s = session(None, "auditor", Duration::hours(1));
        assert!(RouteGuard::authenticated().evaluate(Some(&s), Utc::now()).is_allowed());
        assert_eq!(
            RouteGuard::land_officer().evaluate(Some(&s), Utc::now()),
            GuardDecision::RedirectToUnauthorized
        );
    }

    #[test]
    fn non_string_role_claim_is_unauthorized_not_unauthenticated() {
        use base64::Engine;
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;

        let payload = serde_json::json!({ "role": ["chief_engineer"], "exp": 4_000_000_000u64 });
        let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode(payload.to_string()));
        let decision = RouteGuard::chief_engineer().evaluate_token(Some(&token), Utc::now());
        assert_eq!(decision, GuardDecision::RedirectToUnauthorized);
    }

    #[test]
    fn malformed_token_redirects_to_login() {
        let decision = RouteGuard::authenticated().evaluate_token(Some("not-a-token"), Utc::now());
        assert_eq!(decision, GuardDecision::RedirectToLogin);
        let decision = RouteGuard::authenticated().evaluate_token(None, Utc::now());
        assert_eq!(decision, GuardDecision::RedirectToLogin);
    }

    #[test]
    fn explanation_names_the_denial() {
        let s = session(Some(Role::ProjectEngineer), "project_engineer", Duration::hours(1));
        let explanation = RouteGuard::financial_officer().explain(Some(&s), Utc::now());
        assert!(!explanation.granted);
        let denial = explanation.denial_reason.unwrap();
        assert_eq!(denial.kind, DenialKind::RoleNotAllowed);
        assert_eq!(explanation.required_roles, vec!["financial_officer".to_string()]);

        let explanation = RouteGuard::project_engineer().explain(Some(&s), Utc::now());
        assert!(explanation.granted);
        assert!(explanation.denial_reason.is_none());
    }

    fn role_strategy() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn membership_decides_between_content_and_unauthorized(
            role in role_strategy(),
            allowed in prop::collection::vec(role_strategy(), 1..5),
        ) {
            let s = session(Some(role), role.as_str(), Duration::hours(1));
            let decision = RouteGuard::new(allowed.clone()).evaluate(Some(&s), Utc::now());
            if allowed.contains(&role) {
                prop_assert!(decision.is_allowed());
            } else {
                prop_assert_eq!(decision, GuardDecision::RedirectToUnauthorized);
            }
        }

        #[test]
        fn past_expiry_always_means_login(role in role_strategy(), secs in 0i64..1_000_000) {
            let s = session(Some(role), role.as_str(), Duration::seconds(-secs));
            let decision = RouteGuard::new(Role::ALL).evaluate(Some(&s), Utc::now());
            prop_assert_eq!(decision, GuardDecision::RedirectToLogin);
        }
    }
}
