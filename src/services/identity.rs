//! Returning borrower recognition

use crate::{
    error::{AppError, AppResult},
    models::{enums::LoanStatus, loan::Loan},
    repository::loans::LoanStore,
};

/// Number of trailing NIK digits a returning borrower types in
pub const NIK_SUFFIX_LEN: usize = 4;

/// Check that `suffix` is exactly four ASCII digits
pub fn validate_nik_suffix(suffix: &str) -> AppResult<()> {
    if suffix.len() == NIK_SUFFIX_LEN && suffix.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "NIK suffix must be exactly {} digits",
            NIK_SUFFIX_LEN
        )))
    }
}

/// Most recent loan of the borrower identified by `email` and the last
/// digits of their NIK.
///
/// Among loans with the same `created_at`, the one nearest the head of the
/// store wins.
pub fn find_returning_borrower<'a>(
    loans: &'a LoanStore,
    email: &str,
    nik_suffix: &str,
) -> AppResult<Option<&'a Loan>> {
    validate_nik_suffix(nik_suffix)?;

    let email = email.trim();
    if email.is_empty() {
        return Ok(None);
    }

    let mut latest: Option<&Loan> = None;
    for loan in loans.iter() {
        if !loan.borrower_email.eq_ignore_ascii_case(email) || !loan.borrower_nik.ends_with(nik_suffix) {
            continue;
        }
        match latest {
            Some(current) if current.created_at >= loan.created_at => {}
            _ => latest = Some(loan),
        }
    }
    Ok(latest)
}

/// Approved or returned loans of `item_id` by the borrower with `email`
pub fn borrow_history(loans: &LoanStore, email: &str, item_id: &str) -> usize {
    loans
        .iter()
        .filter(|l| {
            l.belongs_to(email)
                && l.item_id == item_id
                && matches!(l.status, LoanStatus::Approved | LoanStatus::Returned)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::loan::fixtures::loan;
    use chrono::{Duration, Utc};

    fn dated(id: &str, email: &str, nik: &str, days_ago: i64) -> Loan {
        let mut l = loan(id, "1", email, LoanStatus::Returned);
        l.borrower_nik = nik.to_string();
        l.created_at = Utc::now() - Duration::days(days_ago);
        l
    }

    #[test]
    fn test_returns_latest_match() {
        let store = LoanStore::from_loans(vec![
            dated("TRX000003", "siti@mail.com", "8271012304950001", 10),
            dated("TRX000002", "SITI@mail.com", "8271012304950001", 1),
            dated("TRX000001", "siti@mail.com", "8271012304950001", 5),
        ]);
        let found = find_returning_borrower(&store, "Siti@Mail.com", "0001").unwrap();
        assert_eq!(found.map(|l| l.id.as_str()), Some("TRX000002"));
    }

    #[test]
    fn test_no_match_is_none() {
        let store = LoanStore::from_loans(vec![dated("TRX000001", "siti@mail.com", "8271012304950001", 1)]);
        assert!(find_returning_borrower(&store, "siti@mail.com", "9999").unwrap().is_none());
        assert!(find_returning_borrower(&store, "other@mail.com", "0001").unwrap().is_none());
        assert!(find_returning_borrower(&store, "  ", "0001").unwrap().is_none());
    }

    #[test]
    fn test_tie_prefers_head_of_store() {
        let created = Utc::now();
        let mut newer = dated("TRX000002", "a@x.com", "12345678", 0);
        let mut older = dated("TRX000001", "a@x.com", "12345678", 0);
        newer.created_at = created;
        older.created_at = created;
        let store = LoanStore::from_loans(vec![newer, older]);

        let found = find_returning_borrower(&store, "a@x.com", "5678").unwrap();
        assert_eq!(found.map(|l| l.id.as_str()), Some("TRX000002"));
    }

    #[test]
    fn test_suffix_must_be_four_digits() {
        let store = LoanStore::default();
        for bad in ["123", "12345", "12a4", ""] {
            assert!(matches!(
                find_returning_borrower(&store, "a@x.com", bad),
                Err(AppError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_borrow_history_counts_completed_loans_of_item() {
        let mut store = LoanStore::default();
        store.append(loan("TRX000001", "1", "a@x.com", LoanStatus::Returned));
        store.append(loan("TRX000002", "1", "A@X.com", LoanStatus::Approved));
        store.append(loan("TRX000003", "1", "a@x.com", LoanStatus::Pending));
        store.append(loan("TRX000004", "2", "a@x.com", LoanStatus::Approved));
        assert_eq!(borrow_history(&store, "a@x.com", "1"), 2);
        assert_eq!(borrow_history(&store, "b@x.com", "1"), 0);
    }
}
