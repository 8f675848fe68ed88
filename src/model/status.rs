//! Closed status vocabularies.
//!
//! Status columns are stored as lowercase `VARCHAR`. Rows are parsed into these enums as soon as
//! they leave the database and turned back into text only when written.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown {kind} value '{value}'")]
pub struct UnknownStatus {
    pub kind: &'static str,
    pub value: String,
}

/// Lifecycle of a group: `Enrolling -> Active -> Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupStatus {
    Enrolling,
    Active,
    Completed,
}

impl GroupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupStatus::Enrolling => "enrolling",
            GroupStatus::Active => "active",
            GroupStatus::Completed => "completed",
        }
    }
}

impl FromStr for GroupStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "enrolling" => Ok(GroupStatus::Enrolling),
            "active" => Ok(GroupStatus::Active),
            "completed" => Ok(GroupStatus::Completed),
            other => Err(UnknownStatus {
                kind: "group status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "refunded" => Ok(PaymentStatus::Refunded),
            "cancelled" => Ok(PaymentStatus::Cancelled),
            other => Err(UnknownStatus {
                kind: "payment status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcademicStatus {
    Pending,
    Active,
    Completed,
    Dropped,
}

impl AcademicStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcademicStatus::Pending => "pending",
            AcademicStatus::Active => "active",
            AcademicStatus::Completed => "completed",
            AcademicStatus::Dropped => "dropped",
        }
    }
}

impl FromStr for AcademicStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(AcademicStatus::Pending),
            "active" => Ok(AcademicStatus::Active),
            "completed" => Ok(AcademicStatus::Completed),
            "dropped" => Ok(AcademicStatus::Dropped),
            other => Err(UnknownStatus {
                kind: "academic status",
                value: other.to_string(),
            }),
        }
    }
}

/// Recorded attendance for one class session. A missing row is not a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Excused => "excused",
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "late" => Ok(AttendanceStatus::Late),
            "excused" => Ok(AttendanceStatus::Excused),
            other => Err(UnknownStatus {
                kind: "attendance status",
                value: other.to_string(),
            }),
        }
    }
}

/// Outcome written to `enrollment_results.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Approved,
    Failed,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::Approved => "approved",
            ResultStatus::Failed => "failed",
        }
    }
}

impl FromStr for ResultStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "approved" => Ok(ResultStatus::Approved),
            "failed" => Ok(ResultStatus::Failed),
            other => Err(UnknownStatus {
                kind: "result status",
                value: other.to_string(),
            }),
        }
    }
}
