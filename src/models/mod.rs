pub mod account;
pub mod application;
pub mod posting;
pub mod profile;
pub mod search;
pub mod session;
