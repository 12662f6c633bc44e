pub mod grievance;
pub mod profile;
pub mod report;
