pub mod fs;
pub mod poll;
