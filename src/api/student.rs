use super::certificates::{holder_name, load_certificate_view, parse_snapshot};
use super::helper;
use crate::completion::pg::from_numeric;
use crate::errors::AppError;
use crate::model::academic::CompletedGroupRow;
use crate::model::status::{AttendanceStatus, GroupStatus, PaymentStatus};
use crate::model::student::{
    CertificateDetailResponse, CompletedGroupItem, CompletedGroupsResponse, ExamGrade,
    ModuleAttendance, ModuleGrades, PageMeta,
};
use crate::payloads::student::{GetCertificateParams, GetCompletedGroupsParams};
use crate::response::ApiResponse;
use crate::schema::{
    attendances::dsl as att_dsl, certificates::dsl as cert_dsl, class_sessions::dsl as cs_dsl,
    course_versions::dsl as cv_dsl, courses::dsl as courses_dsl,
    enrollment_results::dsl as er_dsl, enrollments::dsl as enr_dsl, exams::dsl as exams_dsl,
    grades::dsl as grades_dsl, groups::dsl as groups_dsl, modules::dsl as modules_dsl,
};
use axum::extract::{Path, Query, State};
use bigdecimal::BigDecimal;
use deadpool_diesel::postgres::Pool;
use diesel::prelude::*;
use std::collections::HashMap;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

const DEFAULT_PER_PAGE: i64 = 10;
const MAX_PER_PAGE: i64 = 100;

/// Lists completed groups in which the student holds a paid enrollment, newest first.
///
/// Query Parameters:
/// * `user_id`: The ID of the student.
/// * `page` (optional, default 1)
/// * `per_page` (optional, default 10, at most 100)
///
/// Returns (wrapped in `ApiResponse`)
/// * `CompletedGroupsResponse`: one page of groups with certificate availability (200 OK).
/// * `400 Bad Request`: If `page` or `per_page` is out of range, or the page offset overflows.
/// * `500 Internal Server Error`: If a database error occurs.
#[instrument(skip(pool, params))]
pub async fn get_completed_groups(
    State(pool): State<Pool>,
    Query(params): Query<GetCompletedGroupsParams>,
) -> Result<ApiResponse<CompletedGroupsResponse>, AppError> {
    info!("Fetching completed groups for user_id: {}", params.user_id);
    debug!("Get completed groups params: {:?}", params);

    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE);
    if page < 1 {
        warn!("Rejecting page {}", page);
        return Err(AppError::BadRequest(format!(
            "page must be at least 1, got {}.",
            page
        )));
    }
    if !(1..=MAX_PER_PAGE).contains(&per_page) {
        warn!("Rejecting per_page {}", per_page);
        return Err(AppError::BadRequest(format!(
            "per_page must be between 1 and {}, got {}.",
            MAX_PER_PAGE, per_page
        )));
    }
    let offset = page_offset(page, per_page)?;

    let user_id = params.user_id;
    let response = helper::run_query(&pool, move |conn| {
        let paid_group_ids = enr_dsl::enrollments
            .filter(enr_dsl::user_id.eq(user_id))
            .filter(enr_dsl::payment_status.eq(PaymentStatus::Paid.as_str()))
            .select(enr_dsl::group_id);

        let total = groups_dsl::groups
            .filter(groups_dsl::status.eq(GroupStatus::Completed.as_str()))
            .filter(groups_dsl::id.eq_any(paid_group_ids.clone()))
            .count()
            .get_result::<i64>(conn)?;

        let rows = groups_dsl::groups
            .inner_join(cv_dsl::course_versions.inner_join(courses_dsl::courses))
            .filter(groups_dsl::status.eq(GroupStatus::Completed.as_str()))
            .filter(groups_dsl::id.eq_any(paid_group_ids))
            .order((groups_dsl::end_date.desc(), groups_dsl::id.desc()))
            .limit(per_page)
            .offset(offset)
            .select((
                groups_dsl::id,
                groups_dsl::name,
                groups_dsl::status,
                groups_dsl::start_date,
                groups_dsl::end_date,
                courses_dsl::name,
                cv_dsl::version,
                cv_dsl::name,
            ))
            .load::<CompletedGroupRow>(conn)?;

        let group_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let certificate_by_group: HashMap<i64, Uuid> = cert_dsl::certificates
            .filter(cert_dsl::user_id.eq(user_id))
            .filter(cert_dsl::group_id.eq_any(group_ids))
            .select((cert_dsl::group_id, cert_dsl::uuid))
            .load::<(i64, Uuid)>(conn)?
            .into_iter()
            .collect();

        let groups = rows
            .into_iter()
            .map(|row| -> Result<CompletedGroupItem, AppError> {
                let certificate_uuid = certificate_by_group.get(&row.id).copied();
                Ok(CompletedGroupItem {
                    id: row.id,
                    name: row.name,
                    course_name: row.course_name,
                    course_version: row.course_version,
                    course_version_name: row.course_version_name,
                    start_date: row.start_date,
                    end_date: row.end_date,
                    status: row.status.parse()?,
                    has_certificate: certificate_uuid.is_some(),
                    certificate_uuid,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompletedGroupsResponse {
            groups,
            meta: PageMeta {
                current_page: page,
                last_page: last_page(total, per_page),
                per_page,
                total,
            },
        })
    })
    .await?;

    info!(
        "Successfully fetched {} of {} completed groups for user_id: {}",
        response.groups.len(),
        response.meta.total,
        user_id
    );
    Ok(ApiResponse::ok(response))
}

/// Full data behind a student's certificate document.
///
/// Path Parameters:
/// * `uuid`: The certificate UUID.
///
/// Query Parameters:
/// * `user_id`: The ID of the student who owns the certificate.
///
/// Returns (wrapped in `ApiResponse`)
/// * `CertificateDetailResponse`: snapshot plus grades and attendance grouped by module (200 OK).
/// * `404 Not Found`: If the certificate does not exist or belongs to another student.
/// * `500 Internal Server Error`: If a database error occurs.
#[instrument(skip(pool, params))]
pub async fn get_certificate(
    State(pool): State<Pool>,
    Path(uuid): Path<Uuid>,
    Query(params): Query<GetCertificateParams>,
) -> Result<ApiResponse<CertificateDetailResponse>, AppError> {
    let user_id = params.user_id;
    info!(%uuid, user_id, "Fetching certificate detail");

    let detail = helper::run_query(&pool, move |conn| {
        let certificate = load_certificate_view(conn, uuid, Some(user_id))?.ok_or_else(|| {
            error!(%uuid, user_id, "Certificate not found for user");
            AppError::NotFound(format!("Certificate {} not found.", uuid))
        })?;

        let enrollment_id = enr_dsl::enrollments
            .filter(enr_dsl::group_id.eq(certificate.group_id))
            .filter(enr_dsl::user_id.eq(certificate.user_id))
            .select(enr_dsl::id)
            .first::<i64>(conn)
            .optional()?
            .ok_or_else(|| {
                error!(%uuid, user_id, "Certificate has no matching enrollment");
                AppError::NotFound(format!("Enrollment for certificate {} not found.", uuid))
            })?;

        let grade_rows = grades_dsl::grades
            .inner_join(exams_dsl::exams.inner_join(modules_dsl::modules))
            .filter(grades_dsl::enrollment_id.eq(enrollment_id))
            .order((modules_dsl::sort.asc(), modules_dsl::id.asc(), exams_dsl::id.asc()))
            .select((modules_dsl::title, exams_dsl::title, grades_dsl::grade))
            .load::<(String, String, BigDecimal)>(conn)?;

        let attendance_rows = att_dsl::attendances
            .inner_join(cs_dsl::class_sessions.inner_join(modules_dsl::modules))
            .filter(att_dsl::enrollment_id.eq(enrollment_id))
            .order((modules_dsl::sort.asc(), modules_dsl::id.asc(), cs_dsl::start_time.asc()))
            .select((modules_dsl::title, att_dsl::status))
            .load::<(String, String)>(conn)?;

        let stored_result = er_dsl::enrollment_results
            .filter(er_dsl::enrollment_id.eq(enrollment_id))
            .select((er_dsl::final_grade, er_dsl::attendance_percentage))
            .first::<(BigDecimal, BigDecimal)>(conn)
            .optional()?;

        let (final_grade, attendance_percentage) = match stored_result {
            Some((grade, attendance)) => (from_numeric(&grade)?, from_numeric(&attendance)?),
            None => (0.0, 0.0),
        };

        let grade_rows = grade_rows
            .into_iter()
            .map(|(module, exam, grade)| -> Result<_, AppError> {
                Ok((module, exam, from_numeric(&grade)?))
            })
            .collect::<Result<Vec<_>, AppError>>()?;
        let attendance_rows = attendance_rows
            .into_iter()
            .map(|(module, status)| -> Result<_, AppError> {
                Ok((module, status.parse::<AttendanceStatus>()?))
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(CertificateDetailResponse {
            uuid: certificate.uuid,
            holder_name: holder_name(&certificate),
            issue_date: certificate.issue_date,
            group_start_date: certificate.group_start_date,
            group_end_date: certificate.group_end_date,
            snapshot: parse_snapshot(&certificate)?,
            module_grades: group_module_grades(grade_rows),
            module_attendances: group_module_attendance(attendance_rows),
            final_grade,
            attendance_percentage,
        })
    })
    .await?;

    info!(%uuid, user_id, "Successfully fetched certificate detail");
    Ok(ApiResponse::ok(detail))
}

/// Rows to skip for `page`. Requires `page >= 1`.
fn page_offset(page: i64, per_page: i64) -> Result<i64, AppError> {
    (page - 1).checked_mul(per_page).ok_or_else(|| {
        warn!("Rejecting page {}: offset overflows", page);
        AppError::BadRequest(format!("page {} is out of range.", page))
    })
}

fn last_page(total: i64, per_page: i64) -> i64 {
    ((total + per_page - 1) / per_page).max(1)
}

/// Groups ordered `(module, exam, grade)` rows by module, keeping first-seen module order.
fn group_module_grades(rows: Vec<(String, String, f64)>) -> Vec<ModuleGrades> {
    let mut modules: Vec<ModuleGrades> = Vec::new();
    for (module, exam, grade) in rows {
        let entry = ExamGrade { exam, grade };
        match modules.iter_mut().find(|m| m.module == module) {
            Some(existing) => existing.grades.push(entry),
            None => modules.push(ModuleGrades {
                module,
                grades: vec![entry],
            }),
        }
    }
    modules
}

/// Present and Late count as present; only recorded sessions count towards the total.
fn group_module_attendance(rows: Vec<(String, AttendanceStatus)>) -> Vec<ModuleAttendance> {
    let mut modules: Vec<ModuleAttendance> = Vec::new();
    for (module, status) in rows {
        let attended = matches!(status, AttendanceStatus::Present | AttendanceStatus::Late);
        let index = match modules.iter().position(|m| m.module == module) {
            Some(index) => index,
            None => {
                modules.push(ModuleAttendance {
                    module,
                    present: 0,
                    total: 0,
                });
                modules.len() - 1
            }
        };
        modules[index].total += 1;
        if attended {
            modules[index].present += 1;
        }
    }
    modules
}
