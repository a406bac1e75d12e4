pub mod conflict;
pub mod inventory;
pub mod membership;
pub mod payment;
pub mod season;
pub mod user;

pub use conflict::ConflictRecord;
pub use inventory::InventoryItem;
pub use membership::RoleMembership;
pub use payment::PaymentRecord;
pub use season::Season;
pub use user::User;
