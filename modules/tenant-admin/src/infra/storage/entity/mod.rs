pub mod team;
pub mod tenant;
pub mod user;
