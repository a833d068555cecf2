pub mod auth;
pub mod clients;
pub mod companies;
pub mod invoices;
pub mod items;
pub mod quotations;
pub mod users;
