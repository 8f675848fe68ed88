use crate::errors::AppError;
use crate::model::academic::CertificateSnapshot;
use crate::model::status::{AttendanceStatus, GroupStatus, ResultStatus};
use crate::completion::calc::AcademicSettings;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct GroupDetails {
    pub id: i64,
    pub name: String,
    pub status: GroupStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub course_name: String,
    pub course_version: String,
}

/// An eligible enrollment with everything needed to grade it.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub enrollment_id: i64,
    pub user_id: i64,
    pub user_name: String,
    /// Grades for exams of this group, exact as stored.
    pub grades: Vec<BigDecimal>,
    /// Recorded attendance for class sessions of this group.
    pub attendance: Vec<AttendanceStatus>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultUpsert {
    pub enrollment_id: i64,
    pub final_grade: f64,
    pub attendance_percentage: f64,
    pub status: ResultStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CertificateIssue {
    pub uuid: Uuid,
    pub user_id: i64,
    pub group_id: i64,
    pub issue_date: DateTime<Utc>,
    pub snapshot: CertificateSnapshot,
}

/// Persistence seen by the completion engine.
///
/// Every method runs on the same connection; `atomically` wraps a closure in a unit of work that
/// either commits all writes or none.
pub trait CompletionStore {
    fn atomically<T, F>(&mut self, work: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Self) -> Result<T, AppError>;

    fn load_group(&mut self, group_id: i64) -> Result<Option<GroupDetails>, AppError>;

    fn load_settings(&mut self) -> Result<Option<AcademicSettings>, AppError>;

    fn count_eligible_enrollments(&mut self, group_id: i64) -> Result<i64, AppError>;

    fn count_class_sessions(&mut self, group_id: i64) -> Result<i64, AppError>;

    fn count_exams(&mut self, group_id: i64) -> Result<i64, AppError>;

    /// Eligible enrollments (paid and active) with their grades and attendance.
    fn load_roster(&mut self, group_id: i64) -> Result<Vec<RosterEntry>, AppError>;

    /// Creates or overwrites the single result row of an enrollment.
    fn upsert_result(&mut self, result: &ResultUpsert) -> Result<(), AppError>;

    fn certificate_exists(&mut self, user_id: i64, group_id: i64) -> Result<bool, AppError>;

    /// Returns `false` when a certificate for the same user and group already exists.
    fn insert_certificate(&mut self, certificate: &CertificateIssue) -> Result<bool, AppError>;

    fn mark_group_completed(&mut self, group_id: i64) -> Result<(), AppError>;
}

/// Clock and identifier source for certificate issuance.
pub trait IssueContext {
    fn now(&self) -> DateTime<Utc>;

    fn new_uuid(&self) -> Uuid;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemIssueContext;

impl IssueContext for SystemIssueContext {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn new_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}
