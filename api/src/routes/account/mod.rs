//! Account-resolution endpoints: the flow's third step.

pub mod login;
pub mod register;
