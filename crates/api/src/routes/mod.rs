pub mod cart;
pub mod health;
pub mod items;
pub mod metrics;
pub mod orders;
