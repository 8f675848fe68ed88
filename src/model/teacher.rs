use crate::model::status::{GroupStatus, ResultStatus};
use serde::{Deserialize, Serialize};

/// Whether a group may be completed, with the counts behind the decision.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EligibilityReport {
    pub can_complete: bool,
    pub has_students: bool,
    pub has_classes: bool,
    pub has_exams: bool,
    pub total_students: i64,
    pub total_classes: i64,
    pub total_exams: i64,
}

impl EligibilityReport {
    /// Exams are informational; only students and classes gate completion.
    pub fn from_counts(total_students: i64, total_classes: i64, total_exams: i64) -> Self {
        let has_students = total_students > 0;
        let has_classes = total_classes > 0;
        EligibilityReport {
            can_complete: has_students && has_classes,
            has_students,
            has_classes,
            has_exams: total_exams > 0,
            total_students,
            total_classes,
            total_exams,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GroupRef {
    pub id: i64,
    pub name: String,
    pub status: GroupStatus,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SettingsUsed {
    pub min_passing_grade: i32,
    pub max_absence_percentage: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StudentResult {
    pub enrollment_id: i64,
    pub user_name: String,
    pub final_grade: f64,
    pub attendance_percentage: f64,
    pub status: ResultStatus,
    /// True only when this run issued a new certificate.
    pub certificate_generated: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CompletionSummary {
    pub group: GroupRef,
    pub total_students: i64,
    pub certificates_generated: i64,
    pub academic_settings_used: SettingsUsed,
    pub results: Vec<StudentResult>,
}

/// Per-student attendance counters shown to teachers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AttendanceBreakdown {
    pub total_classes: i64,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub excused: i64,
    pub attendance_percentage: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StudentAttendanceStatistics {
    pub enrollment_id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub statistics: AttendanceBreakdown,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AttendanceStatisticsResponse {
    pub group_id: i64,
    pub group_name: String,
    pub total_classes: i64,
    pub students_statistics: Vec<StudentAttendanceStatistics>,
}
