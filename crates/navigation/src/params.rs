use serde::Serialize;

use landacq_core::{LotId, PlanId, ProjectId};

/// Identifiers carried by a route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteParams {
    pub project_id: Option<ProjectId>,
    pub plan_id: Option<PlanId>,
    pub lot_id: Option<LotId>,
}

/// Optional display hints a page can pass when it already knows names the
/// path does not carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationContext {
    pub project_id: Option<ProjectId>,
    pub project_name: Option<String>,
    pub plan_name: Option<String>,
    pub lot_name: Option<String>,
}

impl RouteParams {
    /// Extract ids from the segment following each known keyword.
    ///
    /// The first occurrence of a keyword wins; segments that are not valid
    /// identifiers are ignored.
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<&str> = path_only(path).split('/').filter(|s| !s.is_empty()).collect();
        let mut params = RouteParams::default();

        for pair in segments.windows(2) {
            let value = pair[1];
            match pair[0] {
                "project" | "project-details" | "edit-project" => {
                    if params.project_id.is_none() {
                        params.project_id = ProjectId::parse(value).ok();
                    }
                }
                "plan" | "edit-plan" => {
                    if params.plan_id.is_none() {
                        params.plan_id = PlanId::parse(value).ok();
                    }
                }
                "lots" => {
                    if params.lot_id.is_none() {
                        params.lot_id = LotId::parse(value).ok();
                    }
                }
                _ => {}
            }
        }

        params
    }
}

impl NavigationContext {
    pub fn with_project(mut self, id: Option<ProjectId>, name: impl Into<String>) -> Self {
        self.project_id = id;
        self.project_name = Some(name.into());
        self
    }
}

/// Drop any query string or fragment.
pub(crate) fn path_only(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}
