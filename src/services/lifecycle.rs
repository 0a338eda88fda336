//! Loan lifecycle state machine and inventory reconciliation
//!
//! Every operation here runs against an exclusively borrowed [`Repository`]
//! and checks everything it can before touching it, so a failed call leaves
//! the state as it was.

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{BorrowerType, Capability, LoanAction, Role, SubmissionMode},
        loan::{Loan, LoanSubmission, SubmissionReceipt},
    },
    repository::{loans::LoanStore, Repository},
    services::codes,
};

const LOAN_ID_PREFIX: &str = "TRX";

/// Generate a loan id not yet present in `loans`
pub fn generate_loan_id(loans: &LoanStore) -> String {
    loop {
        let id = format!("{}{}", LOAN_ID_PREFIX, codes::upper_code(6));
        if !loans.contains(&id) {
            return id;
        }
    }
}

/// File a new loan request.
///
/// Queued or rejected requests of the same borrower for the same item are
/// replaced by the new one.
pub fn submit(
    repo: &mut Repository,
    role: Role,
    mode: SubmissionMode,
    form: LoanSubmission,
) -> AppResult<SubmissionReceipt> {
    role.require(Capability::SubmitLoan)?;
    form.validate()?;

    if !form.borrower_nik.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::Validation("NIK must contain digits only".to_string()));
    }
    if form.end_date < form.start_date {
        return Err(AppError::Validation(
            "End date cannot be before start date".to_string(),
        ));
    }

    let instance = match form.borrower_type {
        BorrowerType::Instansi => {
            let instance = form.instance.clone().ok_or_else(|| {
                AppError::Validation("Institution details are required".to_string())
            })?;
            instance.validate()?;
            Some(instance)
        }
        BorrowerType::Pribadi => None,
    };

    let signature = form
        .signature
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_default();
    if mode == SubmissionMode::Submit {
        if form.purpose.trim().is_empty() {
            return Err(AppError::Validation("Purpose is required".to_string()));
        }
        if !form.terms_accepted {
            return Err(AppError::Validation(
                "Terms and conditions must be accepted".to_string(),
            ));
        }
        if signature.is_empty() {
            return Err(AppError::Validation("Signature is required".to_string()));
        }
    }

    let item = repo.items.get(&form.item_id)?;
    if !item.is_ready() {
        return Err(AppError::Unavailable(format!(
            "Item {} is out of stock",
            item.name
        )));
    }
    if form.quantity > item.available_quantity {
        return Err(AppError::Validation(format!(
            "Only {} unit(s) of {} are available",
            item.available_quantity, item.name
        )));
    }

    let loan = Loan {
        id: generate_loan_id(&repo.loans),
        item_id: item.id.clone(),
        item_name: item.name.clone(),
        quantity: form.quantity,
        borrower_name: form.borrower_name.trim().to_string(),
        borrower_nik: form.borrower_nik,
        borrower_address: form.borrower_address,
        id_card_photo: form.id_card_photo,
        borrower_type: form.borrower_type,
        instance,
        borrower_email: form.borrower_email.trim().to_string(),
        borrower_phone: form.borrower_phone,
        purpose: form.purpose,
        start_date: form.start_date,
        end_date: form.end_date,
        status: mode.initial_status(),
        signature,
        created_at: Utc::now(),
        rejection_reason: None,
        notified: false,
    };

    let item_id = loan.item_id.clone();
    let email = loan.borrower_email.clone();
    let replaced: Vec<String> = repo
        .loans
        .replace_where(
            |l| l.item_id == item_id && l.belongs_to(&email) && l.status.is_replaceable(),
            loan.clone(),
        )
        .into_iter()
        .map(|l| l.id)
        .collect();

    tracing::info!(
        loan_id = %loan.id,
        item_id = %loan.item_id,
        status = %loan.status,
        quantity = loan.quantity,
        replaced = replaced.len(),
        "Loan request filed"
    );

    Ok(SubmissionReceipt { loan, replaced })
}

/// Admin checked the borrower data
pub fn verify(repo: &mut Repository, role: Role, loan_id: &str) -> AppResult<Loan> {
    transition(repo, role, loan_id, LoanAction::Verify, None)
}

/// Refuse a request. The reason must not be blank.
pub fn reject(repo: &mut Repository, role: Role, loan_id: &str, reason: &str) -> AppResult<Loan> {
    transition(repo, role, loan_id, LoanAction::Reject, Some(reason.to_string()))
}

/// Grant permission and take the units out of stock
pub fn approve(repo: &mut Repository, role: Role, loan_id: &str) -> AppResult<Loan> {
    transition(repo, role, loan_id, LoanAction::Approve, None)
}

/// Ask for further consideration before a decision
pub fn request_review(repo: &mut Repository, role: Role, loan_id: &str) -> AppResult<Loan> {
    transition(repo, role, loan_id, LoanAction::RequestReview, None)
}

/// Record the units as back in stock
pub fn mark_returned(repo: &mut Repository, role: Role, loan_id: &str) -> AppResult<Loan> {
    transition(repo, role, loan_id, LoanAction::Return, None)
}

fn transition(
    repo: &mut Repository,
    role: Role,
    loan_id: &str,
    action: LoanAction,
    reason: Option<String>,
) -> AppResult<Loan> {
    role.require(action.capability())?;

    let loan = repo.loans.get(loan_id)?;
    let from = loan.status;
    if !action.allowed_from().contains(&from) {
        return Err(AppError::PreconditionViolation {
            loan_id: loan_id.to_string(),
            current: from,
            action,
        });
    }
    if action == LoanAction::Reject && reason.as_deref().map_or(true, |r| r.trim().is_empty()) {
        return Err(AppError::Validation("A rejection reason is required".to_string()));
    }

    let item_id = loan.item_id.clone();
    let delta = match action {
        LoanAction::Approve => -i64::from(loan.quantity),
        LoanAction::Return => i64::from(loan.quantity),
        _ => 0,
    };

    let loan = repo.loans.set_status(loan_id, action.target(), reason)?.clone();

    if delta != 0 {
        if repo.items.contains(&item_id) {
            let item = repo.items.adjust_availability(&item_id, delta)?;
            tracing::info!(
                loan_id = %loan.id,
                item_id = %item.id,
                available = item.available_quantity,
                total = item.total_quantity,
                status = %item.status(),
                "Item availability adjusted"
            );
        } else {
            tracing::warn!(
                loan_id = %loan.id,
                item_id = %item_id,
                "Item no longer exists, availability left unchanged"
            );
        }
    }

    tracing::info!(
        loan_id = %loan.id,
        from = %from,
        to = %loan.status,
        role = ?role,
        "Loan status changed"
    );

    Ok(loan)
}
