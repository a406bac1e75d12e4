pub mod init;
pub mod roster;
pub mod seasons;
pub mod users;
