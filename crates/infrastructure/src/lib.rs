pub mod database;
pub mod discovery;
pub mod dns;
pub mod repositories;
