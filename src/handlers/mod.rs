// Handler tiers, outermost guard first:
//   public  - no authentication (/auth/*)
//   session - JWT required, no role requirement (/api/session/*)
//   member / coordinator / admin - JWT + season context + exact role match
pub mod admin;
pub mod coordinator;
pub mod member;
pub mod public;
pub mod session;
