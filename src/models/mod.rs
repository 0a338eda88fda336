//! Data models for SIMPANSE

pub mod enums;
pub mod item;
pub mod loan;
pub mod session;
pub mod settings;
pub mod snapshot;
pub mod user;

// Re-export commonly used types
pub use enums::{BorrowerType, Capability, ItemStatus, LoanAction, LoanStatus, Role, StaffRole};
pub use item::{Item, ItemDetails};
pub use loan::{BorrowerProfile, Loan, LoanSubmission};
pub use settings::SystemConfig;
pub use snapshot::Snapshot;
pub use user::{UserAccount, UserShort};
