//! Active session state

use serde::Serialize;
use utoipa::ToSchema;

use super::{enums::Role, user::UserShort};

/// Identity of the borrower using the kiosk, established by a submission or
/// a returning borrower lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerSession {
    pub email: String,
    pub nik: String,
    pub name: String,
}

impl BorrowerSession {
    pub fn is_empty(&self) -> bool {
        self.email.trim().is_empty()
    }
}

/// The single shared session of the service
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub active_role: Role,
    pub borrower: BorrowerSession,
    /// Logged in staff account, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<UserShort>,
}
