// ABOUTME: HTTP middleware for cross-origin access to the JSON API
// ABOUTME: Provides the CORS layer shared by the server composition

pub mod cors;

// CORS configuration
pub use cors::setup_cors;
