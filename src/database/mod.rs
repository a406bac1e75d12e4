pub mod manager;
pub mod memberships;
pub mod models;

pub use manager::{DatabaseError, DatabaseManager};
pub use memberships::{MembershipError, MembershipStore};
