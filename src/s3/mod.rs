pub mod connection;
pub mod transient;
