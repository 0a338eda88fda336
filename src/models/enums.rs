//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// LoanStatus
// ---------------------------------------------------------------------------

/// Position of a loan request in the approval pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum LoanStatus {
    /// Saved by the borrower without formal submission
    Queued,
    /// Submitted, waiting for an admin to check the data
    Pending,
    /// Data checked by an admin, waiting for the verificator
    Verified,
    /// Verificator asked for further consideration
    ReviewRequired,
    Approved,
    Rejected,
    Returned,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Queued => "Queued",
            LoanStatus::Pending => "Pending",
            LoanStatus::Verified => "Verified",
            LoanStatus::ReviewRequired => "ReviewRequired",
            LoanStatus::Approved => "Approved",
            LoanStatus::Rejected => "Rejected",
            LoanStatus::Returned => "Returned",
        }
    }

    /// Statuses a borrower may overwrite by submitting the same item again
    pub fn is_replaceable(&self) -> bool {
        matches!(self, LoanStatus::Queued | LoanStatus::Rejected)
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "queued" => Ok(LoanStatus::Queued),
            "pending" => Ok(LoanStatus::Pending),
            "verified" => Ok(LoanStatus::Verified),
            "reviewrequired" => Ok(LoanStatus::ReviewRequired),
            "approved" => Ok(LoanStatus::Approved),
            "rejected" => Ok(LoanStatus::Rejected),
            "returned" => Ok(LoanStatus::Returned),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// LoanAction
// ---------------------------------------------------------------------------

/// Staff actions that move an existing loan to another status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum LoanAction {
    Verify,
    Reject,
    Approve,
    RequestReview,
    Return,
}

impl LoanAction {
    /// Statuses the loan must currently be in for the action to apply
    pub fn allowed_from(&self) -> &'static [LoanStatus] {
        match self {
            LoanAction::Verify => &[LoanStatus::Pending],
            LoanAction::Reject => &[
                LoanStatus::Pending,
                LoanStatus::Verified,
                LoanStatus::ReviewRequired,
            ],
            LoanAction::Approve | LoanAction::RequestReview => {
                &[LoanStatus::Verified, LoanStatus::ReviewRequired]
            }
            LoanAction::Return => &[LoanStatus::Approved],
        }
    }

    pub fn target(&self) -> LoanStatus {
        match self {
            LoanAction::Verify => LoanStatus::Verified,
            LoanAction::Reject => LoanStatus::Rejected,
            LoanAction::Approve => LoanStatus::Approved,
            LoanAction::RequestReview => LoanStatus::ReviewRequired,
            LoanAction::Return => LoanStatus::Returned,
        }
    }

    pub fn capability(&self) -> Capability {
        match self {
            LoanAction::Verify => Capability::VerifyLoan,
            LoanAction::Reject => Capability::RejectLoan,
            LoanAction::Approve => Capability::ApproveLoan,
            LoanAction::RequestReview => Capability::RequestReview,
            LoanAction::Return => Capability::ReturnLoan,
        }
    }
}

impl std::fmt::Display for LoanAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LoanAction::Verify => "verify",
            LoanAction::Reject => "reject",
            LoanAction::Approve => "approve",
            LoanAction::RequestReview => "request review for",
            LoanAction::Return => "return",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// SubmissionMode
// ---------------------------------------------------------------------------

/// How a borrower hands in a loan form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionMode {
    /// Submit for approval right away
    Submit,
    /// Keep the form as a draft to finish later
    Later,
}

impl SubmissionMode {
    pub fn initial_status(&self) -> LoanStatus {
        match self {
            SubmissionMode::Submit => LoanStatus::Pending,
            SubmissionMode::Later => LoanStatus::Queued,
        }
    }
}

// ---------------------------------------------------------------------------
// ItemStatus
// ---------------------------------------------------------------------------

/// Readiness of a catalog item, always derived from its available units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ItemStatus {
    Ready,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl ItemStatus {
    pub fn from_available(available: u32) -> Self {
        if available > 0 {
            ItemStatus::Ready
        } else {
            ItemStatus::OutOfStock
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ItemStatus::Ready => "Ready",
            ItemStatus::OutOfStock => "Out of Stock",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// BorrowerType
// ---------------------------------------------------------------------------

/// Whether the borrower acts privately or on behalf of an institution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum BorrowerType {
    #[default]
    Pribadi,
    Instansi,
}

// ---------------------------------------------------------------------------
// Roles and capabilities
// ---------------------------------------------------------------------------

/// Role of a staff account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum StaffRole {
    Admin,
    Verificator,
    SuperAdmin,
}

impl StaffRole {
    /// Human readable name used in account emails
    pub fn display_name(&self) -> &'static str {
        match self {
            StaffRole::Admin => "Admin",
            StaffRole::Verificator => "Verifikator",
            StaffRole::SuperAdmin => "Super Admin",
        }
    }

    /// Facilities listed in the activation email
    pub fn facilities(&self) -> &'static [&'static str] {
        match self {
            StaffRole::Admin => &[
                "Manajemen Master Barang",
                "Monitoring Log Transaksi",
                "Ekspor Laporan CSV",
            ],
            StaffRole::Verificator => &[
                "Otoritas Persetujuan Peminjaman Akhir",
                "Review Validitas Data Pengguna",
            ],
            StaffRole::SuperAdmin => &[
                "Kontrol Penuh Pengguna",
                "Pengaturan Branding Sistem",
            ],
        }
    }
}

/// Role of the active session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[default]
    Borrower,
    Admin,
    Verificator,
    SuperAdmin,
}

impl From<StaffRole> for Role {
    fn from(role: StaffRole) -> Self {
        match role {
            StaffRole::Admin => Role::Admin,
            StaffRole::Verificator => Role::Verificator,
            StaffRole::SuperAdmin => Role::SuperAdmin,
        }
    }
}

/// Operations gated by role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum Capability {
    SubmitLoan,
    VerifyLoan,
    RejectLoan,
    ApproveLoan,
    RequestReview,
    ReturnLoan,
    ManageCatalog,
    ManageUsers,
    ManageSettings,
    ViewAllLoans,
    ExportLoans,
}

impl Role {
    pub fn capabilities(&self) -> &'static [Capability] {
        use Capability::*;
        match self {
            Role::Borrower => &[SubmitLoan],
            Role::Admin => &[
                VerifyLoan,
                RejectLoan,
                ReturnLoan,
                ManageCatalog,
                ViewAllLoans,
                ExportLoans,
            ],
            Role::Verificator => &[ApproveLoan, RequestReview, RejectLoan, ViewAllLoans],
            Role::SuperAdmin => &[ManageUsers, ManageSettings, ViewAllLoans],
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    pub fn require(&self, capability: Capability) -> AppResult<()> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "{:?} is not allowed for role {:?}",
                capability, self
            )))
        }
    }

    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Borrower)
    }
}

// ---------------------------------------------------------------------------
// TransitionType
// ---------------------------------------------------------------------------

/// Animation used by a catalog slider entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum TransitionType {
    Fade,
    Slide,
    Zoom,
    Flip,
    Bounce,
    Rotate,
    SlideUp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_status_from_available() {
        assert_eq!(ItemStatus::from_available(0), ItemStatus::OutOfStock);
        assert_eq!(ItemStatus::from_available(1), ItemStatus::Ready);
    }

    #[test]
    fn test_item_status_serializes_with_space() {
        let json = serde_json::to_string(&ItemStatus::OutOfStock).unwrap();
        assert_eq!(json, "\"Out of Stock\"");
    }

    #[test]
    fn test_loan_status_parse() {
        assert_eq!("reviewrequired".parse::<LoanStatus>(), Ok(LoanStatus::ReviewRequired));
        assert_eq!("Approved".parse::<LoanStatus>(), Ok(LoanStatus::Approved));
        assert!("Lost".parse::<LoanStatus>().is_err());
    }

    #[test]
    fn test_only_queued_and_rejected_are_replaceable() {
        assert!(LoanStatus::Queued.is_replaceable());
        assert!(LoanStatus::Rejected.is_replaceable());
        assert!(!LoanStatus::Pending.is_replaceable());
        assert!(!LoanStatus::Approved.is_replaceable());
    }

    #[test]
    fn test_role_capabilities() {
        assert!(Role::Admin.can(Capability::VerifyLoan));
        assert!(Role::Admin.can(Capability::ReturnLoan));
        assert!(!Role::Admin.can(Capability::ApproveLoan));
        assert!(Role::Verificator.can(Capability::ApproveLoan));
        assert!(Role::Verificator.can(Capability::RejectLoan));
        assert!(!Role::Verificator.can(Capability::ReturnLoan));
        assert!(Role::SuperAdmin.can(Capability::ManageUsers));
        assert!(!Role::SuperAdmin.can(Capability::ApproveLoan));
        assert!(Role::Borrower.can(Capability::SubmitLoan));
        assert!(Role::Borrower.require(Capability::ViewAllLoans).is_err());
    }

    #[test]
    fn test_action_predecessors() {
        assert_eq!(LoanAction::Verify.allowed_from(), &[LoanStatus::Pending]);
        assert!(LoanAction::Approve.allowed_from().contains(&LoanStatus::ReviewRequired));
        assert!(!LoanAction::Approve.allowed_from().contains(&LoanStatus::Approved));
        assert_eq!(LoanAction::Return.target(), LoanStatus::Returned);
    }
}
