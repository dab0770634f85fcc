pub mod connectivity;
pub mod hello;
