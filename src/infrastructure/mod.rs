// Infrastructure layer - External dependencies and adapters
pub mod api_error;
pub mod config;
pub mod http_client;
