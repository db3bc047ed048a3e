use landacq_auth::{Role, RouteGuard};

use crate::params::path_only;

/// Access requirement of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Reachable without a session.
    Public,
    Guarded(RouteGuard),
}

const PUBLIC_PATHS: &[&str] = &[
    "/",
    "/login",
    "/register",
    "/landowner",
    "/unauthorized",
    "/forgot-password",
    "/reset-password",
    "/verify-otp",
];

const ROLE_PREFIXES: &[(&str, Role)] = &[
    ("/ce-dashboard", Role::ChiefEngineer),
    ("/pe-dashboard", Role::ProjectEngineer),
    ("/fo-dashboard", Role::FinancialOfficer),
    ("/lo-dashboard", Role::LandOfficer),
];

fn under(path: &str, prefix: &str) -> bool {
    path == prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
}

/// Look up the access requirement for `path`.
///
/// Role dashboards require their role; every other non-public path requires
/// an authenticated session of any role.
pub fn access_for(path: &str) -> Access {
    let path = path_only(path);
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    if PUBLIC_PATHS.contains(&path) {
        return Access::Public;
    }

    ROLE_PREFIXES
        .iter()
        .find(|(prefix, _)| under(path, prefix))
        .map(|(_, role)| Access::Guarded(RouteGuard::for_role(*role)))
        .unwrap_or_else(|| Access::Guarded(RouteGuard::authenticated()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_entry_points_need_no_session() {
        for path in ["/", "/login", "/login/", "/register?ref=mail", "/verify-otp"] {
            assert_eq!(access_for(path), Access::Public, "{path}");
        }
    }

    #[test]
    fn role_dashboards_require_their_role() {
        assert_eq!(
            access_for("/ce-dashboard/project-requests"),
            Access::Guarded(RouteGuard::chief_engineer())
        );
        assert_eq!(access_for("/lo-dashboard"), Access::Guarded(RouteGuard::land_officer()));
        assert_eq!(
            access_for("/fo-dashboard/plan/1/lots"),
            Access::Guarded(RouteGuard::financial_officer())
        );
    }

    #[test]
    fn everything_else_requires_any_session() {
        assert_eq!(access_for("/dashboard/messages"), Access::Guarded(RouteGuard::authenticated()));
        assert_eq!(access_for("/settings"), Access::Guarded(RouteGuard::authenticated()));
        // Not a role dashboard, just a similar prefix.
        assert_eq!(access_for("/ce-dashboards"), Access::Guarded(RouteGuard::authenticated()));
    }
}
