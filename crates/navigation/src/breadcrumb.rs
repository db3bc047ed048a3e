//! Breadcrumb derivation.
//!
//! Route shapes are matched against the path in [`RULES`] order and the first
//! match builds the trail. Several shapes overlap (a project's plan list also
//! contains `/plans`, a lot detail also contains `/lots`); declaration order
//! is the only tie-breaker. New shapes go at the end.

use serde::Serialize;

use landacq_core::ProjectId;

use crate::Dashboard;
use crate::params::{NavigationContext, RouteParams, path_only};

/// One element of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbItem {
    pub label: String,
    /// Direct link target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Click handler for crumbs that are not plain links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<CrumbAction>,
}

/// Deferred navigation performed when a handled crumb is activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum CrumbAction {
    Navigate(String),
    /// History back; used when the destination id is unknown.
    Back,
}

impl BreadcrumbItem {
    pub fn link(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: Some(target.into()),
            action: None,
        }
    }

    pub fn handled(label: impl Into<String>, action: CrumbAction) -> Self {
        Self {
            label: label.into(),
            target: None,
            action: Some(action),
        }
    }

    pub fn text(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: None,
            action: None,
        }
    }

    pub fn is_clickable(&self) -> bool {
        self.target.is_some() || self.action.is_some()
    }
}

/// Route shapes recognised by the deriver.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteShape {
    ProjectPlans,
    PlanLots,
    LotDetail,
    CreateProject,
    EditProject,
    ProjectDetails,
    CreatePlan,
    EditPlan,
    FinancialDetails,
    Analysis,
    Messages,
    Reports,
    Profile,
    UserManagement,
    ProjectRequests,
    ProjectAssignment,
    AssignedProjects,
    ProjectProgress,
    FinancialReports,
    CostPrediction,
    PlansAndLots,
    Settings,
    Info,
}

/// Priority order: the first shape whose predicate holds wins.
pub const RULES: &[RouteShape] = &[
    RouteShape::ProjectPlans,
    RouteShape::PlanLots,
    RouteShape::LotDetail,
    RouteShape::CreateProject,
    RouteShape::EditProject,
    RouteShape::ProjectDetails,
    RouteShape::CreatePlan,
    RouteShape::EditPlan,
    RouteShape::FinancialDetails,
    RouteShape::Analysis,
    RouteShape::Messages,
    RouteShape::Reports,
    RouteShape::Profile,
    RouteShape::UserManagement,
    RouteShape::ProjectRequests,
    RouteShape::ProjectAssignment,
    RouteShape::AssignedProjects,
    RouteShape::ProjectProgress,
    RouteShape::FinancialReports,
    RouteShape::CostPrediction,
    RouteShape::PlansAndLots,
    RouteShape::Settings,
    RouteShape::Info,
];

/// Inputs shared by every builder.
struct RuleInput<'a> {
    dashboard: Dashboard,
    params: &'a RouteParams,
    context: &'a NavigationContext,
}

impl RuleInput<'_> {
    fn project_id(&self) -> Option<&ProjectId> {
        self.params.project_id.as_ref().or(self.context.project_id.as_ref())
    }

    fn project_plans_path(&self) -> Option<String> {
        self.project_id()
            .map(|id| format!("{}/project/{}/plans", self.dashboard.path(), id))
    }

    /// Crumb leading back to the project's plans.
    ///
    /// With a known project name this is a plain link; otherwise a generic
    /// "Plans & Progress" crumb that navigates on activation.
    fn plans_crumb(&self) -> BreadcrumbItem {
        match (&self.context.project_name, self.project_plans_path()) {
            (Some(name), Some(path)) => BreadcrumbItem::link(name.clone(), path),
            (_, Some(path)) => BreadcrumbItem::handled("Plans & Progress", CrumbAction::Navigate(path)),
            (_, None) => BreadcrumbItem::handled("Plans & Progress", CrumbAction::Back),
        }
    }
}

impl RouteShape {
    /// Path predicate for this shape.
    pub fn matches(&self, path: &str) -> bool {
        let has = |needle: &str| path.contains(needle);
        match self {
            RouteShape::ProjectPlans => has("/project/") && has("/plans"),
            RouteShape::PlanLots => has("/plan/") && has("/lots") && !has("/lots/"),
            RouteShape::LotDetail => has("/plan/") && has("/lots/"),
            RouteShape::CreateProject => has("/create-project"),
            RouteShape::EditProject => has("/edit-project/"),
            RouteShape::ProjectDetails => has("/project-details/"),
            RouteShape::CreatePlan => has("/create-plan"),
            RouteShape::EditPlan => has("/edit-plan/"),
            RouteShape::FinancialDetails => has("/financial-details/"),
            RouteShape::Analysis => has("/analysis"),
            RouteShape::Messages => has("/messages"),
            RouteShape::Reports => has("/reports"),
            RouteShape::Profile => has("/profile"),
            RouteShape::UserManagement => has("/user-management"),
            RouteShape::ProjectRequests => has("/project-requests"),
            RouteShape::ProjectAssignment => has("/project-assignment"),
            RouteShape::AssignedProjects => has("/assigned-projects"),
            RouteShape::ProjectProgress => has("/project-progress"),
            RouteShape::FinancialReports => has("/financial-reports"),
            RouteShape::CostPrediction => has("/cost-prediction"),
            RouteShape::PlansAndLots => has("/plans"),
            RouteShape::Settings => has("/settings"),
            RouteShape::Info => has("/info"),
        }
    }

    /// Label of single-crumb shapes.
    fn terminal_label(&self) -> &'static str {
        match self {
            RouteShape::CreateProject => "Create Project",
            RouteShape::EditProject => "Edit Project",
            RouteShape::CreatePlan => "Create Plan",
            RouteShape::EditPlan => "Edit Plan",
            RouteShape::FinancialDetails => "Financial Details",
            RouteShape::Analysis => "Analysis",
            RouteShape::Messages => "Messages",
            RouteShape::Reports => "Reports",
            RouteShape::Profile => "Profile",
            RouteShape::UserManagement => "User Management",
            RouteShape::ProjectRequests => "Project Requests",
            RouteShape::ProjectAssignment => "Project Assignment",
            RouteShape::AssignedProjects => "Assigned Projects",
            RouteShape::ProjectProgress => "Real Time Dashboard",
            RouteShape::FinancialReports => "Financial Reports",
            RouteShape::CostPrediction => "AI Cost Prediction",
            RouteShape::PlansAndLots => "Plans & Lots",
            RouteShape::Settings => "Settings",
            RouteShape::Info => "Info",
            RouteShape::ProjectPlans | RouteShape::PlanLots | RouteShape::LotDetail => "Plans",
            RouteShape::ProjectDetails => "Project Details",
        }
    }

    /// Crumbs appended after the Dashboard crumb.
    fn build(&self, input: &RuleInput<'_>) -> Vec<BreadcrumbItem> {
        let ctx = input.context;
        match self {
            RouteShape::ProjectPlans => {
                let label = ctx.project_name.clone().unwrap_or_else(|| "Project".to_string());
                let project = match input.project_plans_path() {
                    Some(path) => BreadcrumbItem::link(label, path),
                    None => BreadcrumbItem::text(label),
                };
                vec![project, BreadcrumbItem::text("Plans")]
            }
            RouteShape::PlanLots => vec![input.plans_crumb(), BreadcrumbItem::text("Lots")],
            RouteShape::LotDetail => {
                let label = ctx.plan_name.clone().unwrap_or_else(|| "Lots".to_string());
                let lots = match &input.params.plan_id {
                    Some(plan) => BreadcrumbItem::link(label, format!("{}/plan/{}/lots", input.dashboard.path(), plan)),
                    None => BreadcrumbItem::text(label),
                };
                let lot = match (&ctx.lot_name, &input.params.lot_id) {
                    (Some(name), _) => name.clone(),
                    (None, Some(id)) => format!("Lot {id}"),
                    (None, None) => "Lot".to_string(),
                };
                vec![input.plans_crumb(), lots, BreadcrumbItem::text(lot)]
            }
            RouteShape::ProjectDetails => {
                let details = BreadcrumbItem::text(
                    ctx.project_name.clone().unwrap_or_else(|| "Project Details".to_string()),
                );
                // Chief engineers reach project details from their request queue.
                if input.dashboard == Dashboard::ChiefEngineer {
                    vec![
                        BreadcrumbItem::link("Project Requests", "/ce-dashboard/project-requests"),
                        details,
                    ]
                } else {
                    vec![details]
                }
            }
            other => vec![BreadcrumbItem::text(other.terminal_label())],
        }
    }
}

/// The shape that wins for `path`, if any.
pub fn classify(path: &str) -> Option<RouteShape> {
    let path = path_only(path);
    RULES.iter().copied().find(|shape| shape.matches(path))
}

/// Derive the breadcrumb trail for `path`.
///
/// Always starts with a Dashboard crumb; with no matching shape that is the
/// whole trail. Pure and idempotent.
pub fn derive(path: &str, params: &RouteParams, context: &NavigationContext) -> Vec<BreadcrumbItem> {
    let dashboard = Dashboard::resolve(path_only(path));
    let mut crumbs = vec![BreadcrumbItem::link("Dashboard", dashboard.path())];

    if let Some(shape) = classify(path) {
        tracing::trace!(?shape, path, "breadcrumb rule matched");
        let input = RuleInput {
            dashboard,
            params,
            context,
        };
        crumbs.extend(shape.build(&input));
    }

    crumbs
}

/// [`derive`] with route params extracted from the path itself.
pub fn derive_for_path(path: &str, context: &NavigationContext) -> Vec<BreadcrumbItem> {
    derive(path, &RouteParams::from_path(path), context)
}
