pub mod auth;
pub mod guard;
pub mod response;
pub mod season;

pub use auth::jwt_auth_middleware;
pub use guard::require_role;
pub use response::{ApiResponse, ApiResult};
pub use season::season_scope_middleware;
