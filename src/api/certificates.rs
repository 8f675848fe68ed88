use super::helper;
use crate::errors::AppError;
use crate::model::academic::{CertificateSnapshot, CertificateViewRow};
use crate::model::student::{CertificateVerification, VerifiedCertificate};
use crate::response::ApiResponse;
use crate::schema::{
    certificates::dsl as cert_dsl, groups::dsl as groups_dsl, users::dsl as users_dsl,
};
use axum::extract::{Path, State};
use deadpool_diesel::postgres::Pool;
use diesel::prelude::*;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Loads a certificate with its holder and group, optionally restricted to one owner.
pub(super) fn load_certificate_view(
    conn: &mut PgConnection,
    uuid: Uuid,
    owner_id: Option<i64>,
) -> Result<Option<CertificateViewRow>, AppError> {
    let mut query = cert_dsl::certificates
        .inner_join(users_dsl::users)
        .inner_join(groups_dsl::groups)
        .filter(cert_dsl::uuid.eq(uuid))
        .select((
            cert_dsl::uuid,
            cert_dsl::user_id,
            cert_dsl::group_id,
            cert_dsl::issue_date,
            cert_dsl::extra_data_json,
            users_dsl::name,
            users_dsl::fullname,
            groups_dsl::start_date,
            groups_dsl::end_date,
        ))
        .into_boxed();

    if let Some(user_id) = owner_id {
        query = query.filter(cert_dsl::user_id.eq(user_id));
    }

    Ok(query.first::<CertificateViewRow>(conn).optional()?)
}

pub(super) fn parse_snapshot(row: &CertificateViewRow) -> Result<CertificateSnapshot, AppError> {
    serde_json::from_value(row.extra_data_json.clone()).map_err(|e| {
        AppError::InternalServerError(
            anyhow::Error::new(e).context(format!("Malformed snapshot on certificate {}", row.uuid)),
        )
    })
}

pub(super) fn holder_name(row: &CertificateViewRow) -> String {
    row.holder_fullname
        .clone()
        .unwrap_or_else(|| row.holder_name.clone())
}

/// Public certificate validation.
///
/// Path Parameters:
/// * `uuid`: The certificate UUID printed on the document.
///
/// Returns (wrapped in `ApiResponse`)
/// * `CertificateVerification`: `is_valid = false` with no certificate when the UUID is unknown
///   (200 OK).
/// * `500 Internal Server Error`: If a database error occurs.
#[instrument(skip(pool))]
pub async fn verify_certificate(
    State(pool): State<Pool>,
    Path(uuid): Path<Uuid>,
) -> Result<ApiResponse<CertificateVerification>, AppError> {
    info!(%uuid, "Verifying certificate");

    let verification = helper::run_query(&pool, move |conn| {
        let Some(row) = load_certificate_view(conn, uuid, None)? else {
            return Ok(CertificateVerification {
                is_valid: false,
                certificate: None,
            });
        };

        Ok(CertificateVerification {
            is_valid: true,
            certificate: Some(VerifiedCertificate {
                uuid: row.uuid,
                holder_name: holder_name(&row),
                issue_date: row.issue_date,
                group_start_date: row.group_start_date,
                group_end_date: row.group_end_date,
                snapshot: parse_snapshot(&row)?,
            }),
        })
    })
    .await?;

    if verification.is_valid {
        info!(%uuid, "Certificate is valid");
    } else {
        warn!(%uuid, "Certificate not found");
    }
    Ok(ApiResponse::ok(verification))
}
