pub mod rackhd_client;
pub mod rackhd_endpoint;
pub mod rackhd_trait;
