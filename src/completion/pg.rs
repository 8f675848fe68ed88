use crate::completion::calc::AcademicSettings;
use crate::completion::store::{
    CertificateIssue, CompletionStore, GroupDetails, ResultUpsert, RosterEntry,
};
use crate::errors::AppError;
use crate::model::academic::{
    AcademicSettingsRow, EnrollmentRow, GroupRow, NewCertificate, NewEnrollmentResult,
};
use crate::model::status::{AcademicStatus, AttendanceStatus, GroupStatus, PaymentStatus};
use crate::schema::{
    academic_settings::dsl as settings_dsl, attendances::dsl as att_dsl,
    certificates::dsl as cert_dsl, class_sessions::dsl as cs_dsl,
    course_versions::dsl as cv_dsl, courses::dsl as courses_dsl,
    enrollment_results::dsl as er_dsl, enrollments::dsl as enr_dsl, exams::dsl as exams_dsl,
    grades::dsl as grades_dsl, groups::dsl as groups_dsl, users::dsl as users_dsl,
};
use anyhow::anyhow;
use bigdecimal::{BigDecimal, FromPrimitive, RoundingMode, ToPrimitive};
use diesel::dsl::{exists, now, select};
use diesel::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Stores a computed value in a `NUMERIC(5,2)` column.
pub(crate) fn to_numeric(value: f64) -> Result<BigDecimal, AppError> {
    BigDecimal::from_f64(value)
        .map(|decimal| decimal.with_scale_round(2, RoundingMode::HalfUp))
        .ok_or_else(|| AppError::InternalServerError(anyhow!("{} is not a storable number", value)))
}

pub(crate) fn from_numeric(value: &BigDecimal) -> Result<f64, AppError> {
    value.to_f64().ok_or_else(|| {
        AppError::InternalServerError(anyhow!("Stored number {} does not fit in f64", value))
    })
}

impl CompletionStore for PgConnection {
    fn atomically<T, F>(&mut self, work: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Self) -> Result<T, AppError>,
    {
        Connection::transaction(self, work)
    }

    fn load_group(&mut self, group_id: i64) -> Result<Option<GroupDetails>, AppError> {
        let row = groups_dsl::groups
            .inner_join(cv_dsl::course_versions.inner_join(courses_dsl::courses))
            .filter(groups_dsl::id.eq(group_id))
            .select((
                groups_dsl::id,
                groups_dsl::name,
                groups_dsl::status,
                groups_dsl::start_date,
                groups_dsl::end_date,
                courses_dsl::name,
                cv_dsl::version,
            ))
            .first::<GroupRow>(self)
            .optional()?;

        row.map(|row| -> Result<GroupDetails, AppError> {
            Ok(GroupDetails {
                id: row.id,
                name: row.name,
                status: row.status.parse::<GroupStatus>()?,
                start_date: row.start_date,
                end_date: row.end_date,
                course_name: row.course_name,
                course_version: row.course_version,
            })
        })
        .transpose()
    }

    fn load_settings(&mut self) -> Result<Option<AcademicSettings>, AppError> {
        let row = settings_dsl::academic_settings
            .order(settings_dsl::id.asc())
            .select((
                settings_dsl::min_passing_grade,
                settings_dsl::absence_percentage,
            ))
            .first::<AcademicSettingsRow>(self)
            .optional()?;

        Ok(row.map(|row| AcademicSettings {
            min_passing_grade: row.min_passing_grade,
            max_absence_percentage: row.absence_percentage,
        }))
    }

    fn count_eligible_enrollments(&mut self, group_id: i64) -> Result<i64, AppError> {
        let count = enr_dsl::enrollments
            .filter(enr_dsl::group_id.eq(group_id))
            .filter(enr_dsl::payment_status.eq(PaymentStatus::Paid.as_str()))
            .filter(enr_dsl::academic_status.eq(AcademicStatus::Active.as_str()))
            .count()
            .get_result::<i64>(self)?;
        Ok(count)
    }

    fn count_class_sessions(&mut self, group_id: i64) -> Result<i64, AppError> {
        let count = cs_dsl::class_sessions
            .filter(cs_dsl::group_id.eq(group_id))
            .count()
            .get_result::<i64>(self)?;
        Ok(count)
    }

    fn count_exams(&mut self, group_id: i64) -> Result<i64, AppError> {
        let count = exams_dsl::exams
            .filter(exams_dsl::group_id.eq(group_id))
            .count()
            .get_result::<i64>(self)?;
        Ok(count)
    }

    fn load_roster(&mut self, group_id: i64) -> Result<Vec<RosterEntry>, AppError> {
        let enrollments = enr_dsl::enrollments
            .inner_join(users_dsl::users)
            .filter(enr_dsl::group_id.eq(group_id))
            .filter(enr_dsl::payment_status.eq(PaymentStatus::Paid.as_str()))
            .filter(enr_dsl::academic_status.eq(AcademicStatus::Active.as_str()))
            .order(enr_dsl::id.asc())
            .select((enr_dsl::id, enr_dsl::user_id, users_dsl::name))
            .load::<EnrollmentRow>(self)?;

        let enrollment_ids: Vec<i64> = enrollments.iter().map(|row| row.id).collect();
        debug!(
            group_id,
            eligible = enrollment_ids.len(),
            "Loaded eligible enrollments"
        );

        let grade_rows = grades_dsl::grades
            .inner_join(exams_dsl::exams)
            .filter(exams_dsl::group_id.eq(group_id))
            .filter(grades_dsl::enrollment_id.eq_any(enrollment_ids.clone()))
            .select((grades_dsl::enrollment_id, grades_dsl::grade))
            .load::<(i64, BigDecimal)>(self)?;

        let attendance_rows = att_dsl::attendances
            .inner_join(cs_dsl::class_sessions)
            .filter(cs_dsl::group_id.eq(group_id))
            .filter(att_dsl::enrollment_id.eq_any(enrollment_ids))
            .select((att_dsl::enrollment_id, att_dsl::status))
            .load::<(i64, String)>(self)?;

        let mut grades_by_enrollment: HashMap<i64, Vec<BigDecimal>> = HashMap::new();
        for (enrollment_id, grade) in grade_rows {
            grades_by_enrollment
                .entry(enrollment_id)
                .or_default()
                .push(grade);
        }

        let mut attendance_by_enrollment: HashMap<i64, Vec<AttendanceStatus>> = HashMap::new();
        for (enrollment_id, status) in attendance_rows {
            attendance_by_enrollment
                .entry(enrollment_id)
                .or_default()
                .push(status.parse::<AttendanceStatus>()?);
        }

        Ok(enrollments
            .into_iter()
            .map(|row| RosterEntry {
                enrollment_id: row.id,
                user_id: row.user_id,
                user_name: row.user_name,
                grades: grades_by_enrollment.remove(&row.id).unwrap_or_default(),
                attendance: attendance_by_enrollment.remove(&row.id).unwrap_or_default(),
            })
            .collect())
    }

    fn upsert_result(&mut self, result: &ResultUpsert) -> Result<(), AppError> {
        let row = NewEnrollmentResult {
            enrollment_id: result.enrollment_id,
            final_grade: to_numeric(result.final_grade)?,
            attendance_percentage: to_numeric(result.attendance_percentage)?,
            status: result.status.as_str().to_string(),
        };

        diesel::insert_into(er_dsl::enrollment_results)
            .values(&row)
            .on_conflict(er_dsl::enrollment_id)
            .do_update()
            .set((
                er_dsl::final_grade.eq(row.final_grade.clone()),
                er_dsl::attendance_percentage.eq(row.attendance_percentage.clone()),
                er_dsl::status.eq(row.status.clone()),
                er_dsl::updated_at.eq(now),
            ))
            .execute(self)?;
        Ok(())
    }

    fn certificate_exists(&mut self, user_id: i64, group_id: i64) -> Result<bool, AppError> {
        let found = select(exists(
            cert_dsl::certificates
                .filter(cert_dsl::user_id.eq(user_id))
                .filter(cert_dsl::group_id.eq(group_id)),
        ))
        .get_result::<bool>(self)?;
        Ok(found)
    }

    fn insert_certificate(&mut self, certificate: &CertificateIssue) -> Result<bool, AppError> {
        let extra_data_json = serde_json::to_value(&certificate.snapshot).map_err(|e| {
            AppError::InternalServerError(
                anyhow::Error::new(e).context("Failed to serialize certificate snapshot"),
            )
        })?;

        let new_certificate = NewCertificate {
            uuid: certificate.uuid,
            user_id: certificate.user_id,
            group_id: certificate.group_id,
            issue_date: certificate.issue_date,
            extra_data_json,
        };

        let inserted = diesel::insert_into(cert_dsl::certificates)
            .values(&new_certificate)
            .on_conflict((cert_dsl::user_id, cert_dsl::group_id))
            .do_nothing()
            .execute(self)?;
        Ok(inserted == 1)
    }

    fn mark_group_completed(&mut self, group_id: i64) -> Result<(), AppError> {
        let updated = diesel::update(groups_dsl::groups.find(group_id))
            .set((
                groups_dsl::status.eq(GroupStatus::Completed.as_str()),
                groups_dsl::updated_at.eq(now),
            ))
            .execute(self)?;

        match updated {
            1 => Ok(()),
            0 => Err(AppError::NotFound(format!(
                "Group with ID {} not found.",
                group_id
            ))),
            n => Err(AppError::InternalServerError(anyhow!(
                "Group status update affected {} rows, expected 1",
                n
            ))),
        }
    }
}
