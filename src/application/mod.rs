// Application layer - Use cases over the dashboard API
pub mod chart_service;
pub mod dashboard_api;
