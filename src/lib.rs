pub mod accounts;
pub mod app;
pub mod assume_role;
pub mod broker;
pub mod duration;
pub mod error;
pub mod handler;
pub mod identity;
pub mod kubecfg;
pub mod mfa;
pub mod retry;
pub mod run;
pub mod secrets;
pub mod settings;
