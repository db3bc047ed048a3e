//! Role-scoped sidebar definitions.

use serde::Serialize;

use landacq_auth::Role;

use crate::params::path_only;

/// Icon identifiers; the renderer maps them to glyphs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    LayoutDashboard,
    GitBranch,
    MessageSquare,
    FileText,
    Users,
    FolderPlus,
    BarChart3,
    Plus,
    Building2,
    MapPin,
    DollarSign,
    Settings,
    Info,
}

/// Live counter shown by the shell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    UnreadMessages,
    PendingUsers,
    PendingProjects,
    /// Unread notifications in the top bar; never attached to a menu item.
    Notifications,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub path: &'static str,
    pub label: &'static str,
    pub icon: Icon,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<BadgeKind>,
}

/// A complete sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Menu {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub footer: &'static str,
    pub items: &'static [MenuItem],
    /// Items pinned below the main list.
    pub bottom_items: &'static [MenuItem],
}

impl Menu {
    /// Badge kinds this menu needs, in item order, without duplicates.
    pub fn badge_kinds(&self) -> Vec<BadgeKind> {
        let mut kinds = Vec::new();
        for kind in self.all_items().filter_map(|item| item.badge) {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }

    pub fn all_items(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.iter().chain(self.bottom_items.iter())
    }
}

const fn item(path: &'static str, label: &'static str, icon: Icon) -> MenuItem {
    MenuItem {
        path,
        label,
        icon,
        badge: None,
    }
}

const fn badged(path: &'static str, label: &'static str, icon: Icon, badge: BadgeKind) -> MenuItem {
    MenuItem {
        path,
        label,
        icon,
        badge: Some(badge),
    }
}

const CONTROL_PANEL: &str = "Control Panel";

static CHIEF_ENGINEER: Menu = Menu {
    title: "Chief Engineer",
    subtitle: CONTROL_PANEL,
    footer: "Chief Engineer Dashboard v1.0",
    items: &[
        item("/ce-dashboard", "Dashboard", Icon::LayoutDashboard),
        item("/ce-dashboard/project-progress", "Real Time Dashboard", Icon::GitBranch),
        badged("/ce-dashboard/messages", "Messages", Icon::MessageSquare, BadgeKind::UnreadMessages),
        item("/ce-dashboard/reports", "Reports", Icon::FileText),
        badged("/ce-dashboard/user-management", "User Management", Icon::Users, BadgeKind::PendingUsers),
        badged(
            "/ce-dashboard/project-requests",
            "Project Requests",
            Icon::FolderPlus,
            BadgeKind::PendingProjects,
        ),
    ],
    bottom_items: &[],
};

static PROJECT_ENGINEER: Menu = Menu {
    title: "Project Engineer",
    subtitle: CONTROL_PANEL,
    footer: "Project Engineer Dashboard v1.0",
    items: &[
        item("/pe-dashboard", "Dashboard", Icon::LayoutDashboard),
        item("/pe-dashboard/analysis", "Analysis", Icon::BarChart3),
        badged("/pe-dashboard/messages", "Messages", Icon::MessageSquare, BadgeKind::UnreadMessages),
        item("/pe-dashboard/reports", "Reports", Icon::FileText),
        item("/pe-dashboard/create-project", "Create Project", Icon::Plus),
    ],
    bottom_items: &[],
};

static LAND_OFFICER: Menu = Menu {
    title: "Land Officer",
    subtitle: CONTROL_PANEL,
    footer: "Land Officer Dashboard v1.0",
    items: &[
        item("/lo-dashboard", "Dashboard", Icon::LayoutDashboard),
        item("/lo-dashboard/assigned-projects", "Assigned Projects", Icon::Building2),
        item("/lo-dashboard/create-plan", "Create Plan", Icon::Plus),
        item("/lo-dashboard/plans", "Plans & Lots", Icon::MapPin),
        item("/lo-dashboard/analysis", "Analysis", Icon::BarChart3),
        item("/lo-dashboard/reports", "Reports", Icon::FileText),
        badged("/lo-dashboard/messages", "Messages", Icon::MessageSquare, BadgeKind::UnreadMessages),
    ],
    bottom_items: &[],
};

static FINANCIAL_OFFICER: Menu = Menu {
    title: "Financial Officer",
    subtitle: CONTROL_PANEL,
    footer: "Financial Officer Dashboard v1.0",
    items: &[
        item("/fo-dashboard", "Dashboard", Icon::LayoutDashboard),
        item("/fo-dashboard/financial-reports", "Financial Reports", Icon::DollarSign),
        item("/fo-dashboard/analysis", "Analysis", Icon::BarChart3),
        item("/fo-dashboard/reports", "Reports", Icon::FileText),
        badged("/fo-dashboard/messages", "Messages", Icon::MessageSquare, BadgeKind::UnreadMessages),
    ],
    bottom_items: &[],
};

static GENERIC: Menu = Menu {
    title: "Dashboard",
    subtitle: CONTROL_PANEL,
    footer: "Dashboard v1.0",
    items: &[
        item("/dashboard", "Dashboard", Icon::LayoutDashboard),
        item("/dashboard/analysis", "Analysis", Icon::BarChart3),
        badged("/dashboard/messages", "Messages", Icon::MessageSquare, BadgeKind::UnreadMessages),
        item("/dashboard/reports", "Reports", Icon::FileText),
    ],
    bottom_items: &[
        item("/settings", "Settings", Icon::Settings),
        item("/info", "Info", Icon::Info),
    ],
};

/// Sidebar for a role. Landowners and sessions without a recognised role
/// get the generic `/dashboard` menu.
pub fn menu_for(role: Option<Role>) -> &'static Menu {
    match role {
        Some(Role::ChiefEngineer) => &CHIEF_ENGINEER,
        Some(Role::ProjectEngineer) => &PROJECT_ENGINEER,
        Some(Role::LandOfficer) => &LAND_OFFICER,
        Some(Role::FinancialOfficer) => &FINANCIAL_OFFICER,
        Some(Role::Landowner) | None => &GENERIC,
    }
}

/// Whether `item` is highlighted for `current_path`: exact match or a
/// descendant path. Sibling prefixes (`/reports-archive`) do not count, and
/// any query string or fragment is ignored.
pub fn is_active(item: &MenuItem, current_path: &str) -> bool {
    let current_path = path_only(current_path);
    current_path == item.path
        || current_path
            .strip_prefix(item.path)
            .is_some_and(|rest| rest.starts_with('/'))
}
