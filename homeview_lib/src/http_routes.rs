pub mod static_resources;
