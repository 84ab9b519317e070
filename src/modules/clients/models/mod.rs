mod client;

pub use client::{Client, CreateClientRequest, UpdateClientRequest};
