pub mod contact;
pub mod gateway;
pub mod result;
pub mod status;
pub mod summary;
pub mod template;
pub mod validation;
