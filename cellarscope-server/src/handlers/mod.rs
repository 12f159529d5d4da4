pub mod catalog;
pub mod health;
pub mod scans;
pub mod shell;
