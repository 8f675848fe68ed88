//! In-memory [`CompletionStore`] with snapshot rollback, for engine tests.

use crate::completion::calc::AcademicSettings;
use crate::completion::store::{
    CertificateIssue, CompletionStore, GroupDetails, IssueContext, ResultUpsert, RosterEntry,
};
use crate::errors::AppError;
use crate::model::status::{AttendanceStatus, GroupStatus};
use anyhow::anyhow;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryStore {
    pub groups: HashMap<i64, GroupDetails>,
    pub settings: Option<AcademicSettings>,
    pub class_sessions: i64,
    pub exams: i64,
    /// Eligible enrollments only.
    pub roster: Vec<RosterEntry>,
    pub results: HashMap<i64, ResultUpsert>,
    pub certificates: Vec<CertificateIssue>,
    /// Makes the result upsert of this enrollment fail.
    pub fail_upsert_for: Option<i64>,
    /// Simulates another transaction inserting this (user, group) certificate first.
    pub race_certificate_for: Option<(i64, i64)>,
}

impl MemoryStore {
    pub fn with_group(group_id: i64, status: GroupStatus) -> Self {
        let mut store = MemoryStore::default();
        store.groups.insert(
            group_id,
            GroupDetails {
                id: group_id,
                name: format!("Group {}", group_id),
                status,
                start_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 3, 13).unwrap(),
                course_name: "Rust Fundamentals".to_string(),
                course_version: "v2".to_string(),
            },
        );
        store
    }

    pub fn add_student(
        &mut self,
        enrollment_id: i64,
        user_id: i64,
        user_name: &str,
        grades: Vec<f64>,
        attendance: Vec<AttendanceStatus>,
    ) {
        self.roster.push(RosterEntry {
            enrollment_id,
            user_id,
            user_name: user_name.to_string(),
            // shortest decimal form, so 19.99 stays 19.99
            grades: grades
                .iter()
                .map(|grade| BigDecimal::from_str(&grade.to_string()).unwrap())
                .collect(),
            attendance,
        });
    }

    pub fn group_status(&self, group_id: i64) -> Option<GroupStatus> {
        self.groups.get(&group_id).map(|group| group.status)
    }

    pub fn set_group_status(&mut self, group_id: i64, status: GroupStatus) {
        if let Some(group) = self.groups.get_mut(&group_id) {
            group.status = status;
        }
    }

    fn has_certificate(&self, user_id: i64, group_id: i64) -> bool {
        self.certificates
            .iter()
            .any(|c| c.user_id == user_id && c.group_id == group_id)
    }
}

impl CompletionStore for MemoryStore {
    fn atomically<T, F>(&mut self, work: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Self) -> Result<T, AppError>,
    {
        let checkpoint = self.clone();
        let outcome = work(self);
        if outcome.is_err() {
            *self = checkpoint;
        }
        outcome
    }

    fn load_group(&mut self, group_id: i64) -> Result<Option<GroupDetails>, AppError> {
        Ok(self.groups.get(&group_id).cloned())
    }

    fn load_settings(&mut self) -> Result<Option<AcademicSettings>, AppError> {
        Ok(self.settings)
    }

    fn count_eligible_enrollments(&mut self, _group_id: i64) -> Result<i64, AppError> {
        Ok(self.roster.len() as i64)
    }

    fn count_class_sessions(&mut self, _group_id: i64) -> Result<i64, AppError> {
        Ok(self.class_sessions)
    }

    fn count_exams(&mut self, _group_id: i64) -> Result<i64, AppError> {
        Ok(self.exams)
    }

    fn load_roster(&mut self, _group_id: i64) -> Result<Vec<RosterEntry>, AppError> {
        Ok(self.roster.clone())
    }

    fn upsert_result(&mut self, result: &ResultUpsert) -> Result<(), AppError> {
        if self.fail_upsert_for == Some(result.enrollment_id) {
            return Err(AppError::InternalServerError(anyhow!("simulated write failure")));
        }
        self.results.insert(result.enrollment_id, result.clone());
        Ok(())
    }

    fn certificate_exists(&mut self, user_id: i64, group_id: i64) -> Result<bool, AppError> {
        Ok(self.has_certificate(user_id, group_id))
    }

    fn insert_certificate(&mut self, certificate: &CertificateIssue) -> Result<bool, AppError> {
        if self.race_certificate_for == Some((certificate.user_id, certificate.group_id))
            && !self.has_certificate(certificate.user_id, certificate.group_id)
        {
            let mut winner = certificate.clone();
            winner.uuid = Uuid::from_u128(u128::MAX);
            self.certificates.push(winner);
        }

        if self.has_certificate(certificate.user_id, certificate.group_id) {
            return Ok(false);
        }
        self.certificates.push(certificate.clone());
        Ok(true)
    }

    fn mark_group_completed(&mut self, group_id: i64) -> Result<(), AppError> {
        match self.groups.get_mut(&group_id) {
            Some(group) => {
                group.status = GroupStatus::Completed;
                Ok(())
            }
            None => Err(AppError::NotFound(format!(
                "Group with ID {} not found.",
                group_id
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FixedIssueContext {
    pub now: DateTime<Utc>,
    pub uuid: Uuid,
}

impl FixedIssueContext {
    pub fn with_uuid(uuid: Uuid) -> Self {
        FixedIssueContext {
            uuid,
            ..FixedIssueContext::default()
        }
    }
}

impl Default for FixedIssueContext {
    fn default() -> Self {
        FixedIssueContext {
            now: Utc.with_ymd_and_hms(2026, 3, 20, 15, 30, 0).unwrap(),
            uuid: Uuid::from_u128(1),
        }
    }
}

impl IssueContext for FixedIssueContext {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn new_uuid(&self) -> Uuid {
        self.uuid
    }
}
