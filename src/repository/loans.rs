//! Loan record store

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{BorrowerType, LoanStatus},
        loan::{Institution, Loan},
    },
};

/// Loan requests, newest first
#[derive(Debug, Clone, Default)]
pub struct LoanStore {
    loans: Vec<Loan>,
}

impl LoanStore {
    /// Load saved loans. Institution data is kept for `Instansi`
    /// borrowers only.
    pub fn from_loans(loans: Vec<Loan>) -> Self {
        let loans = loans
            .into_iter()
            .map(|mut loan| {
                loan.instance = match loan.borrower_type {
                    BorrowerType::Pribadi => None,
                    BorrowerType::Instansi => Some(loan.instance.take().unwrap_or_else(|| {
                        tracing::warn!(loan_id = %loan.id, "Institution details missing from saved loan");
                        Institution::default()
                    })),
                };
                loan
            })
            .collect();
        Self { loans }
    }

    pub fn to_vec(&self) -> Vec<Loan> {
        self.loans.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Loan> {
        self.loans.iter()
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.loans.iter().any(|l| l.id == id)
    }

    pub fn get(&self, id: &str) -> AppResult<&Loan> {
        self.loans
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Loan {} not found", id)))
    }

    /// Insert a loan at the head of the list
    pub fn append(&mut self, loan: Loan) {
        self.loans.insert(0, loan);
    }

    /// Remove every loan matching `predicate`, then append `loan`.
    /// Returns the removed records.
    pub fn replace_where<P>(&mut self, predicate: P, loan: Loan) -> Vec<Loan>
    where
        P: Fn(&Loan) -> bool,
    {
        let (removed, kept): (Vec<Loan>, Vec<Loan>) =
            std::mem::take(&mut self.loans).into_iter().partition(|l| predicate(l));
        self.loans = kept;
        self.append(loan);
        removed
    }

    /// Change the status of a loan in place, keeping its position.
    ///
    /// A rejection reason is required for `Rejected` and cleared for any
    /// other status.
    pub fn set_status(
        &mut self,
        id: &str,
        status: LoanStatus,
        rejection_reason: Option<String>,
    ) -> AppResult<&Loan> {
        let rejection_reason = match (status, rejection_reason) {
            (LoanStatus::Rejected, Some(reason)) if !reason.trim().is_empty() => Some(reason),
            (LoanStatus::Rejected, _) => {
                return Err(AppError::Validation("A rejection reason is required".to_string()))
            }
            (_, _) => None,
        };

        let loan = self
            .loans
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Loan {} not found", id)))?;
        loan.status = status;
        loan.rejection_reason = rejection_reason;
        Ok(loan)
    }

    pub fn query<P>(&self, predicate: P) -> Vec<&Loan>
    where
        P: Fn(&Loan) -> bool,
    {
        self.loans.iter().filter(|l| predicate(l)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::loan::fixtures::loan;

    fn ids(store: &LoanStore) -> Vec<&str> {
        store.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn test_append_is_newest_first() {
        let mut store = LoanStore::default();
        store.append(loan("TRX000001", "1", "a@x.com", LoanStatus::Pending));
        store.append(loan("TRX000002", "2", "a@x.com", LoanStatus::Pending));
        assert_eq!(ids(&store), vec!["TRX000002", "TRX000001"]);
    }

    #[test]
    fn test_replace_where_removes_matches_and_prepends() {
        let mut store = LoanStore::from_loans(vec![
            loan("TRX000003", "1", "a@x.com", LoanStatus::Queued),
            loan("TRX000002", "2", "b@x.com", LoanStatus::Pending),
            loan("TRX000001", "1", "a@x.com", LoanStatus::Rejected),
        ]);

        let removed = store.replace_where(
            |l| l.item_id == "1" && l.status.is_replaceable(),
            loan("TRX000004", "1", "a@x.com", LoanStatus::Pending),
        );

        assert_eq!(removed.len(), 2);
        assert_eq!(ids(&store), vec!["TRX000004", "TRX000002"]);
    }

    #[test]
    fn test_set_status_keeps_position() {
        let mut store = LoanStore::from_loans(vec![
            loan("TRX000002", "2", "a@x.com", LoanStatus::Pending),
            loan("TRX000001", "1", "a@x.com", LoanStatus::Pending),
        ]);
        store.set_status("TRX000001", LoanStatus::Verified, None).unwrap();
        assert_eq!(ids(&store), vec!["TRX000002", "TRX000001"]);
        assert_eq!(store.get("TRX000001").unwrap().status, LoanStatus::Verified);
    }

    #[test]
    fn test_rejected_requires_reason() {
        let mut store = LoanStore::from_loans(vec![loan("TRX000001", "1", "a@x.com", LoanStatus::Pending)]);

        let result = store.set_status("TRX000001", LoanStatus::Rejected, Some("   ".into()));
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.get("TRX000001").unwrap().status, LoanStatus::Pending);

        let loan = store
            .set_status("TRX000001", LoanStatus::Rejected, Some("Dokumen tidak lengkap".into()))
            .unwrap();
        assert_eq!(loan.rejection_reason.as_deref(), Some("Dokumen tidak lengkap"));
    }

    #[test]
    fn test_reason_cleared_for_other_statuses() {
        let mut store = LoanStore::from_loans(vec![loan("TRX000001", "1", "a@x.com", LoanStatus::Rejected)]);
        let loan = store
            .set_status("TRX000001", LoanStatus::Pending, Some("ignored".into()))
            .unwrap();
        assert_eq!(loan.rejection_reason, None);
    }

    #[test]
    fn test_unknown_loan() {
        let mut store = LoanStore::default();
        assert!(matches!(
            store.set_status("TRX404", LoanStatus::Verified, None),
            Err(AppError::NotFound(_))
        ));
        assert!(store.get("TRX404").is_err());
    }

    #[test]
    fn test_query() {
        let store = LoanStore::from_loans(vec![
            loan("TRX000002", "2", "a@x.com", LoanStatus::Approved),
            loan("TRX000001", "1", "b@x.com", LoanStatus::Pending),
        ]);
        let approved = store.query(|l| l.status == LoanStatus::Approved);
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].id, "TRX000002");
    }
}
