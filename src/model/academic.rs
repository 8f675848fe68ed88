use crate::schema::certificates;
use crate::schema::enrollment_results;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::{Insertable, Queryable};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

#[derive(Insertable, Debug)]
#[diesel(table_name = enrollment_results)]
pub struct NewEnrollmentResult {
    pub enrollment_id: i64,
    pub final_grade: BigDecimal,
    pub attendance_percentage: BigDecimal,
    pub status: String,
    // created_at, updated_at have DB defaults
}

#[derive(Insertable, Debug)]
#[diesel(table_name = certificates)]
pub struct NewCertificate {
    pub uuid: Uuid,
    pub user_id: i64,
    pub group_id: i64,
    pub issue_date: DateTime<Utc>,
    pub extra_data_json: JsonValue,
}

/// Group joined with its course version and course.
#[derive(Queryable, Debug)]
pub struct GroupRow {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub course_name: String,
    pub course_version: String,
}

#[derive(Queryable, Debug)]
pub struct AcademicSettingsRow {
    pub min_passing_grade: i32,
    pub absence_percentage: f64,
}

#[derive(Queryable, Debug)]
pub struct EnrollmentRow {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
}

/// Data frozen into `certificates.extra_data_json` at issuance.
///
/// Field names are read verbatim by the certificate renderer and the public validation page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CertificateSnapshot {
    pub course_name: String,
    pub course_version: String,
    pub group_name: String,
    pub final_grade: f64,
    pub attendance_percentage: f64,
    pub issue_date: NaiveDate,
    pub total_students_in_group: i64,
}

#[derive(Queryable, Debug)]
pub struct CompletedGroupRow {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub course_name: String,
    pub course_version: String,
    pub course_version_name: String,
}

/// Certificate joined with its holder and group.
#[derive(Queryable, Debug)]
pub struct CertificateViewRow {
    pub uuid: Uuid,
    pub user_id: i64,
    pub group_id: i64,
    pub issue_date: DateTime<Utc>,
    pub extra_data_json: JsonValue,
    pub holder_name: String,
    pub holder_fullname: Option<String>,
    pub group_start_date: NaiveDate,
    pub group_end_date: NaiveDate,
}

#[derive(Queryable, Debug)]
pub struct StudentContactRow {
    pub enrollment_id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
}
