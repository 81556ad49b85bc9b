pub mod context;
pub mod handlers;
pub mod middleware;
pub mod router;
