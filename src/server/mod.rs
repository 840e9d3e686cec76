pub mod guards;
pub mod router;
pub mod routes;
