//! Loan request service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{Capability, LoanStatus},
        loan::{
            BorrowerProfile, Loan, LoanQuery, LookupRequest, LookupResponse, SubmissionReceipt,
            SubmitLoanRequest,
        },
    },
    repository::{loans::LoanStore, SharedRepository},
    services::{identity, lifecycle, session::SessionService},
};

/// CSV export of the loan log
#[derive(Debug, Clone)]
pub struct LoanReport {
    pub filename: String,
    pub content: String,
}

const REPORT_HEADER: [&str; 7] = [
    "ID",
    "Borrower Name",
    "NIK",
    "Asset",
    "Status",
    "Start Date",
    "End Date",
];

#[derive(Clone)]
pub struct LoansService {
    repository: SharedRepository,
    session: SessionService,
}

impl LoansService {
    pub fn new(repository: SharedRepository, session: SessionService) -> Self {
        Self { repository, session }
    }

    /// File a loan form, as a request or as a draft
    pub async fn submit(&self, request: SubmitLoanRequest) -> AppResult<SubmissionReceipt> {
        let role = self.session.role().await;
        let receipt = self
            .repository
            .transaction(|repo| lifecycle::submit(repo, role, request.mode, request.form))
            .await?;

        let loan = &receipt.loan;
        self.session
            .establish_borrower(&loan.borrower_email, &loan.borrower_nik, &loan.borrower_name)
            .await;
        Ok(receipt)
    }

    /// Recognize a returning borrower and hand back their details
    pub async fn lookup(&self, request: &LookupRequest) -> AppResult<LookupResponse> {
        let response = self
            .repository
            .read(|repo| {
                let loan = identity::find_returning_borrower(&repo.loans, &request.email, &request.nik_suffix)?
                    .ok_or_else(|| {
                        AppError::NotFound(
                            "No previous loan matches this email and NIK. Please register as a new borrower."
                                .to_string(),
                        )
                    })?;
                let borrow_count = request
                    .item_id
                    .as_deref()
                    .map_or(0, |item_id| identity::borrow_history(&repo.loans, &loan.borrower_email, item_id));
                Ok::<_, AppError>(LookupResponse {
                    profile: BorrowerProfile::from(loan),
                    source_loan_id: loan.id.clone(),
                    borrow_count,
                })
            })
            .await?;

        let profile = &response.profile;
        self.session
            .establish_borrower(&profile.borrower_email, &profile.borrower_nik, &profile.borrower_name)
            .await;
        tracing::info!(source_loan_id = %response.source_loan_id, "Returning borrower recognized");
        Ok(response)
    }

    /// Loans visible to the active session: everything for staff, the
    /// borrower's own loans otherwise
    pub async fn my_loans(&self) -> Vec<Loan> {
        let session = self.session.current().await;
        self.repository
            .read(|repo| {
                if session.active_role.is_staff() {
                    repo.loans.to_vec()
                } else {
                    own_loans(&repo.loans, &session.borrower.email)
                        .into_iter()
                        .cloned()
                        .collect()
                }
            })
            .await
    }

    /// The borrower's saved drafts
    pub async fn drafts(&self) -> Vec<Loan> {
        let borrower = self.session.borrower().await;
        self.repository
            .read(|repo| {
                own_loans(&repo.loans, &borrower.email)
                    .into_iter()
                    .filter(|l| l.status == LoanStatus::Queued)
                    .cloned()
                    .collect()
            })
            .await
    }

    /// Staff listing with filters
    pub async fn list(&self, query: &LoanQuery) -> AppResult<Vec<Loan>> {
        self.session.role().await.require(Capability::ViewAllLoans)?;
        Ok(self
            .repository
            .read(|repo| repo.loans.query(|l| query.matches(l)).into_iter().cloned().collect())
            .await)
    }

    /// Loans waiting for the verificator
    pub async fn review_queue(&self) -> AppResult<Vec<Loan>> {
        self.session.role().await.require(Capability::ApproveLoan)?;
        Ok(self
            .repository
            .read(|repo| {
                repo.loans
                    .query(|l| matches!(l.status, LoanStatus::Verified | LoanStatus::ReviewRequired))
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .await)
    }

    /// A single loan. Borrowers only see their own.
    pub async fn get_loan(&self, id: &str) -> AppResult<Loan> {
        let session = self.session.current().await;
        let loan = self
            .repository
            .read(|repo| repo.loans.get(id).cloned())
            .await?;
        if session.active_role.is_staff() || loan.belongs_to(&session.borrower.email) {
            Ok(loan)
        } else {
            Err(AppError::Authorization(format!(
                "Loan {} belongs to another borrower",
                id
            )))
        }
    }

    pub async fn verify(&self, id: &str) -> AppResult<Loan> {
        let role = self.session.role().await;
        self.repository
            .transaction(|repo| lifecycle::verify(repo, role, id))
            .await
    }

    pub async fn reject(&self, id: &str, reason: &str) -> AppResult<Loan> {
        let role = self.session.role().await;
        self.repository
            .transaction(|repo| lifecycle::reject(repo, role, id, reason))
            .await
    }

    pub async fn approve(&self, id: &str) -> AppResult<Loan> {
        let role = self.session.role().await;
        self.repository
            .transaction(|repo| lifecycle::approve(repo, role, id))
            .await
    }

    pub async fn request_review(&self, id: &str) -> AppResult<Loan> {
        let role = self.session.role().await;
        self.repository
            .transaction(|repo| lifecycle::request_review(repo, role, id))
            .await
    }

    pub async fn mark_returned(&self, id: &str) -> AppResult<Loan> {
        let role = self.session.role().await;
        self.repository
            .transaction(|repo| lifecycle::mark_returned(repo, role, id))
            .await
    }

    /// CSV report of every loan in store order
    pub async fn export_csv(&self) -> AppResult<LoanReport> {
        self.session.role().await.require(Capability::ExportLoans)?;
        let loans = self.repository.read(|repo| repo.loans.to_vec()).await;
        if loans.is_empty() {
            return Err(AppError::Validation("There are no loans to export".to_string()));
        }

        Ok(LoanReport {
            filename: format!("LAPORAN_SIMPANSE_{}.csv", Utc::now().format("%Y-%m-%d")),
            content: loans_csv(&loans),
        })
    }
}

fn own_loans<'a>(loans: &'a LoanStore, email: &str) -> Vec<&'a Loan> {
    if email.trim().is_empty() {
        return Vec::new();
    }
    loans.query(|l| l.belongs_to(email))
}

/// Fields are joined as they are, without quoting
fn loans_csv(loans: &[Loan]) -> String {
    let mut lines = vec![REPORT_HEADER.join(",")];
    lines.extend(loans.iter().map(|l| {
        [
            l.id.clone(),
            l.borrower_name.clone(),
            l.borrower_nik.clone(),
            l.item_name.clone(),
            l.status.to_string(),
            l.start_date.to_string(),
            l.end_date.to_string(),
        ]
        .join(",")
    }));
    lines.join("\n")
}
