use crate::completion::calc::{self, AcademicSettings, StudentOutcome};
use crate::completion::store::{
    CertificateIssue, CompletionStore, GroupDetails, IssueContext, ResultUpsert, RosterEntry,
};
use crate::errors::AppError;
use crate::model::academic::CertificateSnapshot;
use crate::model::status::{GroupStatus, ResultStatus};
use crate::model::teacher::{
    CompletionSummary, EligibilityReport, GroupRef, SettingsUsed, StudentResult,
};
use tracing::{debug, info, instrument, warn};

/// Counts eligible enrollments, class sessions and exams of a group. Read-only.
#[instrument(skip(store))]
pub fn check_eligibility<S: CompletionStore>(
    store: &mut S,
    group_id: i64,
) -> Result<EligibilityReport, AppError> {
    let total_students = store.count_eligible_enrollments(group_id)?;
    let total_classes = store.count_class_sessions(group_id)?;
    let total_exams = store.count_exams(group_id)?;

    let report = EligibilityReport::from_counts(total_students, total_classes, total_exams);
    debug!(?report, "Eligibility computed");
    Ok(report)
}

/// Grades every eligible enrollment of the group, issues missing certificates to approved
/// students and marks the group completed, all in one unit of work.
///
/// Does not look at the current group status, so a completed group can be recomputed: results
/// are overwritten and existing certificates are left untouched.
#[instrument(skip(store, context))]
pub fn complete_group<S, C>(
    store: &mut S,
    group_id: i64,
    context: &C,
) -> Result<CompletionSummary, AppError>
where
    S: CompletionStore,
    C: IssueContext,
{
    store.atomically(|tx| {
        let group = find_group(tx, group_id)?;
        run_completion(tx, &group, context)
    })
}

/// [`complete_group`] guarded by the workflow preconditions: the group must be active and have
/// at least one eligible student and one class session.
#[instrument(skip(store, context))]
pub fn complete_active_group<S, C>(
    store: &mut S,
    group_id: i64,
    context: &C,
) -> Result<CompletionSummary, AppError>
where
    S: CompletionStore,
    C: IssueContext,
{
    store.atomically(|tx| {
        let group = find_group(tx, group_id)?;

        match group.status {
            GroupStatus::Active => {}
            GroupStatus::Completed => {
                warn!(group_id, "Group is already completed");
                return Err(AppError::UnprocessableEntity(format!(
                    "Group with ID {} is already completed.",
                    group_id
                )));
            }
            GroupStatus::Enrolling => {
                warn!(group_id, "Group is still enrolling");
                return Err(AppError::UnprocessableEntity(format!(
                    "Only active groups can be completed; group with ID {} is still enrolling.",
                    group_id
                )));
            }
        }

        let report = check_eligibility(tx, group_id)?;
        if !report.can_complete {
            warn!(group_id, ?report, "Group does not meet completion requirements");
            return Err(AppError::PreconditionFailed {
                message: precondition_message(&report),
                report,
            });
        }

        run_completion(tx, &group, context)
    })
}

fn find_group<S: CompletionStore>(store: &mut S, group_id: i64) -> Result<GroupDetails, AppError> {
    store.load_group(group_id)?.ok_or_else(|| {
        warn!(group_id, "Group not found");
        AppError::NotFound(format!("Group with ID {} not found.", group_id))
    })
}

fn precondition_message(report: &EligibilityReport) -> String {
    let mut missing = Vec::new();
    if !report.has_students {
        missing.push("eligible students");
    }
    if !report.has_classes {
        missing.push("class sessions");
    }
    format!("Group cannot be completed: no {}.", missing.join(" and no "))
}

fn run_completion<S, C>(
    tx: &mut S,
    group: &GroupDetails,
    context: &C,
) -> Result<CompletionSummary, AppError>
where
    S: CompletionStore,
    C: IssueContext,
{
    let settings = tx.load_settings()?.ok_or_else(|| {
        AppError::Configuration("No academic settings found; cannot grade the group.".to_string())
    })?;
    info!(
        group_id = group.id,
        min_passing_grade = settings.min_passing_grade,
        max_absence_percentage = settings.max_absence_percentage,
        "Starting group completion"
    );

    let total_classes = tx.count_class_sessions(group.id)?;
    let roster = tx.load_roster(group.id)?;
    let total_students = roster.len() as i64;

    let mut results = Vec::with_capacity(roster.len());
    let mut certificates_generated = 0;

    for entry in &roster {
        let outcome = calc::grade_student(&entry.grades, &entry.attendance, total_classes, &settings);
        debug!(
            enrollment_id = entry.enrollment_id,
            final_grade = outcome.final_grade,
            attendance_percentage = outcome.attendance_percentage,
            status = outcome.status.as_str(),
            "Student graded"
        );

        tx.upsert_result(&ResultUpsert {
            enrollment_id: entry.enrollment_id,
            final_grade: outcome.final_grade,
            attendance_percentage: outcome.attendance_percentage,
            status: outcome.status,
        })?;

        let certificate_generated = match outcome.status {
            ResultStatus::Approved => {
                issue_certificate(tx, group, entry, &outcome, total_students, context)?
            }
            ResultStatus::Failed => false,
        };
        if certificate_generated {
            certificates_generated += 1;
        }

        results.push(StudentResult {
            enrollment_id: entry.enrollment_id,
            user_name: entry.user_name.clone(),
            final_grade: outcome.final_grade,
            attendance_percentage: outcome.attendance_percentage,
            status: outcome.status,
            certificate_generated,
        });
    }

    tx.mark_group_completed(group.id)?;

    info!(
        group_id = group.id,
        total_students, certificates_generated, "Group completion finished"
    );

    Ok(CompletionSummary {
        group: GroupRef {
            id: group.id,
            name: group.name.clone(),
            status: GroupStatus::Completed,
        },
        total_students,
        certificates_generated,
        academic_settings_used: settings_used(&settings),
        results,
    })
}

fn settings_used(settings: &AcademicSettings) -> SettingsUsed {
    SettingsUsed {
        min_passing_grade: settings.min_passing_grade,
        max_absence_percentage: settings.max_absence_percentage,
    }
}

/// Returns whether a new certificate was written. Existing certificates are never touched.
fn issue_certificate<S, C>(
    tx: &mut S,
    group: &GroupDetails,
    entry: &RosterEntry,
    outcome: &StudentOutcome,
    total_students: i64,
    context: &C,
) -> Result<bool, AppError>
where
    S: CompletionStore,
    C: IssueContext,
{
    if tx.certificate_exists(entry.user_id, group.id)? {
        debug!(
            user_id = entry.user_id,
            group_id = group.id,
            "Certificate already issued, skipping"
        );
        return Ok(false);
    }

    let issued_at = context.now();
    let certificate = CertificateIssue {
        uuid: context.new_uuid(),
        user_id: entry.user_id,
        group_id: group.id,
        issue_date: issued_at,
        snapshot: CertificateSnapshot {
            course_name: group.course_name.clone(),
            course_version: group.course_version.clone(),
            group_name: group.name.clone(),
            final_grade: outcome.final_grade,
            attendance_percentage: outcome.attendance_percentage,
            issue_date: issued_at.date_naive(),
            total_students_in_group: total_students,
        },
    };

    let inserted = tx.insert_certificate(&certificate)?;
    if inserted {
        info!(
            user_id = entry.user_id,
            group_id = group.id,
            uuid = %certificate.uuid,
            "Certificate issued"
        );
    } else {
        debug!(
            user_id = entry.user_id,
            group_id = group.id,
            "Certificate inserted concurrently, skipping"
        );
    }
    Ok(inserted)
}
