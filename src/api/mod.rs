pub mod models;
pub mod proxy;
pub mod response;
pub mod routes;
