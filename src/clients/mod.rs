pub mod gateway;
pub mod zapi;
