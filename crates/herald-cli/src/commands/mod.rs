pub mod publish;
pub mod validate;
