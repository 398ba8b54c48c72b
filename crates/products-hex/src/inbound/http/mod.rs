mod server;

pub use server::{router, CreateProductRequest, HttpServer, HttpServerConfig};
