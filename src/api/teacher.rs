use super::helper;
use crate::completion::{self, CompletionStore, SystemIssueContext, calc};
use crate::errors::AppError;
use crate::model::academic::StudentContactRow;
use crate::model::status::{AcademicStatus, AttendanceStatus, PaymentStatus};
use crate::model::teacher::{
    AttendanceStatisticsResponse, CompletionSummary, EligibilityReport,
    StudentAttendanceStatistics,
};
use crate::response::ApiResponse;
use crate::schema::{
    attendances::dsl as att_dsl, class_sessions::dsl as cs_dsl, enrollments::dsl as enr_dsl,
    groups::dsl as groups_dsl, users::dsl as users_dsl,
};
use axum::extract::{Path, State};
use deadpool_diesel::postgres::Pool;
use diesel::prelude::*;
use std::collections::HashMap;
use tracing::{debug, error, info, instrument};

/// Reports whether a group may be completed.
///
/// Path Parameters:
/// * `group_id`: The ID of the group.
///
/// Returns (wrapped in `ApiResponse`)
/// * `EligibilityReport`: eligible student, class session and exam counts (200 OK).
/// * `404 Not Found`: If the group does not exist.
/// * `500 Internal Server Error`: If a database error occurs.
#[instrument(skip(pool))]
pub async fn can_complete_group(
    State(pool): State<Pool>,
    Path(group_id): Path<i64>,
) -> Result<ApiResponse<EligibilityReport>, AppError> {
    info!("Checking completion eligibility for group_id: {}", group_id);

    let report = helper::run_query(&pool, move |conn| {
        if conn.load_group(group_id)?.is_none() {
            error!("Group with ID {} not found.", group_id);
            return Err(AppError::NotFound(format!(
                "Group with ID {} not found.",
                group_id
            )));
        }
        completion::check_eligibility(conn, group_id)
    })
    .await?;

    info!(
        "Group {} can_complete: {} ({} students, {} classes, {} exams)",
        group_id,
        report.can_complete,
        report.total_students,
        report.total_classes,
        report.total_exams
    );
    Ok(ApiResponse::ok(report))
}

/// Completes an active group: computes every eligible student's result, issues certificates to
/// approved students and marks the group as completed. All-or-nothing.
///
/// Path Parameters:
/// * `group_id`: The ID of the group.
///
/// Returns (wrapped in `ApiResponse`)
/// * `CompletionSummary`: per-student results and counters (200 OK).
/// * `404 Not Found`: If the group does not exist.
/// * `422 Unprocessable Entity`: If the group is not active, or has no eligible students or
///   class sessions (the eligibility report is returned as `data`).
/// * `500 Internal Server Error`: If academic settings are missing or a database error occurs.
#[instrument(skip(pool))]
pub async fn complete_group(
    State(pool): State<Pool>,
    Path(group_id): Path<i64>,
) -> Result<ApiResponse<CompletionSummary>, AppError> {
    info!("Attempting to complete group_id: {}", group_id);

    let summary = helper::run_query(&pool, move |conn| {
        completion::complete_active_group(conn, group_id, &SystemIssueContext)
    })
    .await?;

    info!(
        "Group {} completed: {} students processed, {} certificates generated",
        group_id, summary.total_students, summary.certificates_generated
    );
    Ok(ApiResponse::ok(summary))
}

/// Attendance counters per eligible student, as displayed to teachers.
///
/// Unrecorded sessions count as absent; present, late and excused count as attended. This view
/// is not used for pass/fail decisions.
///
/// Path Parameters:
/// * `group_id`: The ID of the group.
///
/// Returns (wrapped in `ApiResponse`)
/// * `AttendanceStatisticsResponse` (200 OK).
/// * `404 Not Found`: If the group does not exist.
/// * `500 Internal Server Error`: If a database error occurs.
#[instrument(skip(pool))]
pub async fn get_attendance_statistics(
    State(pool): State<Pool>,
    Path(group_id): Path<i64>,
) -> Result<ApiResponse<AttendanceStatisticsResponse>, AppError> {
    info!("Fetching attendance statistics for group_id: {}", group_id);

    let response = helper::run_query(&pool, move |conn| {
        let group_name = groups_dsl::groups
            .find(group_id)
            .select(groups_dsl::name)
            .first::<String>(conn)
            .optional()?
            .ok_or_else(|| {
                error!("Group with ID {} not found.", group_id);
                AppError::NotFound(format!("Group with ID {} not found.", group_id))
            })?;

        let session_ids = cs_dsl::class_sessions
            .filter(cs_dsl::group_id.eq(group_id))
            .order((cs_dsl::start_time.asc(), cs_dsl::id.asc()))
            .select(cs_dsl::id)
            .load::<i64>(conn)?;

        let students = enr_dsl::enrollments
            .inner_join(users_dsl::users)
            .filter(enr_dsl::group_id.eq(group_id))
            .filter(enr_dsl::payment_status.eq(PaymentStatus::Paid.as_str()))
            .filter(enr_dsl::academic_status.eq(AcademicStatus::Active.as_str()))
            .order(enr_dsl::id.asc())
            .select((enr_dsl::id, users_dsl::id, users_dsl::name, users_dsl::email))
            .load::<StudentContactRow>(conn)?;

        let records = att_dsl::attendances
            .inner_join(cs_dsl::class_sessions)
            .filter(cs_dsl::group_id.eq(group_id))
            .select((
                att_dsl::enrollment_id,
                att_dsl::class_session_id,
                att_dsl::status,
            ))
            .load::<(i64, i64, String)>(conn)?;
        debug!(
            "Loaded {} sessions, {} students and {} attendance rows for group {}",
            session_ids.len(),
            students.len(),
            records.len(),
            group_id
        );

        let mut by_session: HashMap<(i64, i64), AttendanceStatus> = HashMap::new();
        for (enrollment_id, session_id, status) in records {
            by_session.insert((enrollment_id, session_id), status.parse()?);
        }

        let students_statistics = students
            .into_iter()
            .map(|student| {
                let statistics = calc::attendance_breakdown(
                    session_ids
                        .iter()
                        .map(|session_id| by_session.get(&(student.enrollment_id, *session_id)).copied()),
                );
                StudentAttendanceStatistics {
                    enrollment_id: student.enrollment_id,
                    user_id: student.user_id,
                    name: student.name,
                    email: student.email,
                    statistics,
                }
            })
            .collect();

        Ok(AttendanceStatisticsResponse {
            group_id,
            group_name,
            total_classes: session_ids.len() as i64,
            students_statistics,
        })
    })
    .await?;

    info!(
        "Successfully computed attendance statistics for {} students in group {}",
        response.students_statistics.len(),
        group_id
    );
    Ok(ApiResponse::ok(response))
}
