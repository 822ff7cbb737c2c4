pub mod body;
pub mod branch;
