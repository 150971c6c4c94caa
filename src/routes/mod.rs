pub mod auth;
pub mod businesses;
pub mod customers;
pub mod health;
pub mod organizations;
pub mod users;
