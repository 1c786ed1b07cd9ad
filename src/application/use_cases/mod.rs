pub mod account;
pub mod billing;
pub mod due_date;
