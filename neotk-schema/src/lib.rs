pub mod accounts;
pub mod credentials;
