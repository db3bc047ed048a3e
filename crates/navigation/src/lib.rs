//! `landacq-navigation`: pure navigation derivation.
//!
//! Given a URL path (and optional caller hints) this crate answers: which
//! dashboard the path belongs to, which guard protects it, which breadcrumb
//! trail to show, and which sidebar menu a role gets. No IO.

pub mod access;
pub mod breadcrumb;
pub mod dashboard;
pub mod menu;
pub mod params;

pub use access::{Access, access_for};
pub use breadcrumb::{BreadcrumbItem, CrumbAction, RULES, RouteShape, classify, derive, derive_for_path};
pub use dashboard::Dashboard;
pub use menu::{BadgeKind, Icon, Menu, MenuItem, is_active, menu_for};
pub use params::{NavigationContext, RouteParams};
