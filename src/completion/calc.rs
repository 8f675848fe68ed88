//! Pure grading arithmetic. Nothing here touches storage.

use crate::model::status::{AttendanceStatus, ResultStatus};
use crate::model::teacher::AttendanceBreakdown;
use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};
use serde::{Deserialize, Serialize};

/// Thresholds read from `academic_settings` once per completion run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct AcademicSettings {
    /// 0-20 scale.
    pub min_passing_grade: i32,
    pub max_absence_percentage: f64,
}

impl AcademicSettings {
    pub fn min_attendance_percentage(&self) -> f64 {
        100.0 - self.max_absence_percentage
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudentOutcome {
    pub final_grade: f64,
    pub attendance_percentage: f64,
    pub status: ResultStatus,
}

/// Two decimals, half away from zero, computed on the exact decimal value.
pub fn round2(value: &BigDecimal) -> f64 {
    // Rounded values fit NUMERIC(5,2), so the conversion cannot fail.
    value
        .with_scale_round(2, RoundingMode::HalfUp)
        .to_f64()
        .unwrap_or_default()
}

/// `part / whole * 100`, rounded with [`round2`]. `whole` must be positive.
fn percentage(part: i64, whole: i64) -> f64 {
    round2(&(BigDecimal::from(part * 100) / BigDecimal::from(whole)))
}

/// Mean of every grade the student holds in the group. No grades yields `0.0`.
pub fn final_grade(grades: &[BigDecimal]) -> f64 {
    if grades.is_empty() {
        return 0.0;
    }

    let total: BigDecimal = grades.iter().sum();
    round2(&(total / BigDecimal::from(grades.len() as i64)))
}

/// Attendance used for pass/fail.
///
/// Absences are explicit `Absent` rows plus every session with no row at all. `Late` and
/// `Excused` rows are neither absences nor presences here. A group without sessions yields
/// `100.0`.
pub fn attendance_percentage(total_classes: i64, records: &[AttendanceStatus]) -> f64 {
    if total_classes <= 0 {
        return 100.0;
    }

    let absent = records
        .iter()
        .filter(|status| **status == AttendanceStatus::Absent)
        .count() as i64;
    let unrecorded = (total_classes - records.len() as i64).max(0);
    let attended = (total_classes - absent - unrecorded).max(0);

    percentage(attended, total_classes).clamp(0.0, 100.0)
}

/// Approved only when both the grade and the attendance thresholds are met.
pub fn determine_status(
    final_grade: f64,
    attendance_percentage: f64,
    settings: &AcademicSettings,
) -> ResultStatus {
    let grade_ok = final_grade >= f64::from(settings.min_passing_grade);
    let attendance_ok = attendance_percentage >= settings.min_attendance_percentage();

    if grade_ok && attendance_ok {
        ResultStatus::Approved
    } else {
        ResultStatus::Failed
    }
}

pub fn grade_student(
    grades: &[BigDecimal],
    attendance: &[AttendanceStatus],
    total_classes: i64,
    settings: &AcademicSettings,
) -> StudentOutcome {
    let final_grade = final_grade(grades);
    let attendance_percentage = attendance_percentage(total_classes, attendance);
    StudentOutcome {
        final_grade,
        attendance_percentage,
        status: determine_status(final_grade, attendance_percentage, settings),
    }
}

/// Attendance counters for the teacher statistics view.
///
/// One entry per class session of the group, `None` where nothing was recorded (counted as
/// absent). Present, Late and Excused all count as attended. A group without sessions yields
/// `0.0`. This is deliberately not the formula used by [`attendance_percentage`].
pub fn attendance_breakdown<I>(sessions: I) -> AttendanceBreakdown
where
    I: IntoIterator<Item = Option<AttendanceStatus>>,
{
    let mut breakdown = AttendanceBreakdown::default();

    for record in sessions {
        breakdown.total_classes += 1;
        match record {
            Some(AttendanceStatus::Present) => breakdown.present += 1,
            Some(AttendanceStatus::Late) => breakdown.late += 1,
            Some(AttendanceStatus::Excused) => breakdown.excused += 1,
            Some(AttendanceStatus::Absent) | None => breakdown.absent += 1,
        }
    }

    if breakdown.total_classes > 0 {
        let attended = breakdown.present + breakdown.late + breakdown.excused;
        breakdown.attendance_percentage = percentage(attended, breakdown.total_classes);
    }

    breakdown
}
