pub mod inspect;
pub mod project;
pub mod xy;
