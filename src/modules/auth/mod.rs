pub mod controller;
pub mod model;
pub mod revocation;
pub mod router;
pub mod service;
