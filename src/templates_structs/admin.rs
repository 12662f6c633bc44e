use askama::Template;

use crate::audit::AuditEntry;
use crate::models::grievance::Grievance;
use crate::models::report::{Agency, Report, ReportStatus};
use super::AdminContext;

#[derive(Template)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub app_name: String,
    pub csrf_token: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/grievances/list.html")]
pub struct AdminGrievancesTemplate {
    pub ctx: AdminContext,
    pub grievances: Vec<Grievance>,
}

#[derive(Template)]
#[template(path = "admin/grievances/detail.html")]
pub struct AdminGrievanceDetailTemplate {
    pub ctx: AdminContext,
    pub grievance: Grievance,
}

#[derive(Template)]
#[template(path = "admin/grievances/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub ctx: AdminContext,
    pub grievance: Grievance,
}

#[derive(Template)]
#[template(path = "admin/reports/list.html")]
pub struct AdminReportsTemplate {
    pub ctx: AdminContext,
    pub agency: Agency,
    pub agencies: Vec<Agency>,
    pub reports: Vec<Report>,
    pub statuses: Vec<ReportStatus>,
}

#[derive(Template)]
#[template(path = "admin/audit.html")]
pub struct AuditTemplate {
    pub ctx: AdminContext,
    pub entries: Vec<AuditEntry>,
}
