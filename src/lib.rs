pub mod logic;
pub mod translate;
