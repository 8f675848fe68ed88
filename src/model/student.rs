use crate::model::academic::CertificateSnapshot;
use crate::model::status::GroupStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CompletedGroupItem {
    pub id: i64,
    pub name: String,
    pub course_name: String,
    pub course_version: String,
    pub course_version_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: GroupStatus,
    pub has_certificate: bool,
    pub certificate_uuid: Option<Uuid>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PageMeta {
    pub current_page: i64,
    pub last_page: i64,
    pub per_page: i64,
    pub total: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CompletedGroupsResponse {
    pub groups: Vec<CompletedGroupItem>,
    pub meta: PageMeta,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExamGrade {
    pub exam: String,
    pub grade: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ModuleGrades {
    pub module: String,
    pub grades: Vec<ExamGrade>,
}

/// `present` counts Present and Late rows; `total` counts recorded rows only.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ModuleAttendance {
    pub module: String,
    pub present: i64,
    pub total: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CertificateDetailResponse {
    pub uuid: Uuid,
    pub holder_name: String,
    pub issue_date: DateTime<Utc>,
    pub group_start_date: NaiveDate,
    pub group_end_date: NaiveDate,
    pub snapshot: CertificateSnapshot,
    pub module_grades: Vec<ModuleGrades>,
    pub module_attendances: Vec<ModuleAttendance>,
    pub final_grade: f64,
    pub attendance_percentage: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VerifiedCertificate {
    pub uuid: Uuid,
    pub holder_name: String,
    pub issue_date: DateTime<Utc>,
    pub group_start_date: NaiveDate,
    pub group_end_date: NaiveDate,
    pub snapshot: CertificateSnapshot,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CertificateVerification {
    pub is_valid: bool,
    pub certificate: Option<VerifiedCertificate>,
}
