//! Loan request model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{BorrowerType, LoanStatus, SubmissionMode};

/// Institution a borrower acts on behalf of.
///
/// Flattened into its owner as `instanceName`, `instanceAddress`,
/// `instancePhone` and `instanceEmail`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Institution {
    #[serde(rename = "instanceName")]
    #[validate(length(min = 1, message = "Institution name is required"))]
    pub name: String,
    #[serde(rename = "instanceAddress")]
    #[validate(length(min = 1, message = "Institution address is required"))]
    pub address: String,
    #[serde(rename = "instancePhone")]
    #[validate(length(min = 1, message = "Institution phone is required"))]
    pub phone: String,
    #[serde(rename = "instanceEmail")]
    #[validate(email(message = "Invalid institution email"))]
    pub email: String,
}

/// A single request to borrow units of an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: String,
    pub item_id: String,
    /// Item name at submission time
    pub item_name: String,
    pub quantity: u32,
    pub borrower_name: String,
    #[serde(rename = "borrowerNIK")]
    pub borrower_nik: String,
    pub borrower_address: String,
    /// Identity card scan as a data URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_card_photo: Option<String>,
    pub borrower_type: BorrowerType,
    /// Present only for `Instansi` borrowers
    #[serde(flatten)]
    pub instance: Option<Institution>,
    pub borrower_email: String,
    pub borrower_phone: String,
    pub purpose: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: LoanStatus,
    /// Signature image as a data URL
    pub signature: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub notified: bool,
}

impl Loan {
    pub fn belongs_to(&self, email: &str) -> bool {
        !email.is_empty() && self.borrower_email.eq_ignore_ascii_case(email.trim())
    }
}

/// Loan form as filled in by a borrower
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanSubmission {
    #[validate(length(min = 1, message = "Item is required"))]
    pub item_id: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
    #[validate(length(min = 1, message = "Borrower name is required"))]
    pub borrower_name: String,
    #[serde(rename = "borrowerNIK")]
    #[validate(length(min = 4, message = "NIK must have at least 4 digits"))]
    pub borrower_nik: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub borrower_address: String,
    pub id_card_photo: Option<String>,
    #[serde(default)]
    pub borrower_type: BorrowerType,
    #[serde(flatten)]
    pub instance: Option<Institution>,
    #[validate(email(message = "Invalid borrower email"))]
    pub borrower_email: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub borrower_phone: String,
    #[serde(default)]
    pub purpose: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub signature: Option<String>,
    #[serde(default)]
    pub terms_accepted: bool,
}

/// Submit loan request body
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitLoanRequest {
    pub mode: SubmissionMode,
    #[serde(flatten)]
    pub form: LoanSubmission,
}

/// Identity data carried over from a previous loan to prefill a new form
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerProfile {
    pub borrower_name: String,
    #[serde(rename = "borrowerNIK")]
    pub borrower_nik: String,
    pub borrower_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_card_photo: Option<String>,
    pub borrower_type: BorrowerType,
    #[serde(flatten)]
    pub instance: Option<Institution>,
    pub borrower_email: String,
    pub borrower_phone: String,
    pub signature: String,
}

impl From<&Loan> for BorrowerProfile {
    fn from(loan: &Loan) -> Self {
        Self {
            borrower_name: loan.borrower_name.clone(),
            borrower_nik: loan.borrower_nik.clone(),
            borrower_address: loan.borrower_address.clone(),
            id_card_photo: loan.id_card_photo.clone(),
            borrower_type: loan.borrower_type,
            instance: loan.instance.clone(),
            borrower_email: loan.borrower_email.clone(),
            borrower_phone: loan.borrower_phone.clone(),
            signature: loan.signature.clone(),
        }
    }
}

/// Returning borrower lookup request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    pub email: String,
    /// Last four digits of the NIK
    pub nik_suffix: String,
    /// Item about to be borrowed, used to count earlier loans of it
    pub item_id: Option<String>,
}

/// Result of a successful returning borrower lookup
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LookupResponse {
    pub profile: BorrowerProfile,
    /// Loan the profile was taken from
    pub source_loan_id: String,
    /// Approved or returned loans of the requested item by this borrower
    pub borrow_count: usize,
}

/// Reject loan request body
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RejectLoanRequest {
    pub reason: String,
}

/// Staff loan listing filter
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct LoanQuery {
    pub status: Option<LoanStatus>,
    /// Case-insensitive match on borrower name or item name
    pub search: Option<String>,
}

impl LoanQuery {
    pub fn matches(&self, loan: &Loan) -> bool {
        let matches_status = self.status.map_or(true, |s| loan.status == s);
        let matches_search = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                loan.borrower_name.to_lowercase().contains(&term)
                    || loan.item_name.to_lowercase().contains(&term)
            }
            _ => true,
        };
        matches_status && matches_search
    }
}

/// Outcome of a submission
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub loan: Loan,
    /// Ids of queued or rejected loans replaced by this one
    pub replaced: Vec<String>,
}
