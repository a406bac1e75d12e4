pub mod dashboard;
pub mod roster;
pub mod seasons;
