pub mod admin_grievance_handlers;
pub mod admin_report_handlers;
pub mod api;
pub mod audit_handlers;
pub mod auth_handlers;
pub mod grievance_handlers;
pub mod report_handlers;
