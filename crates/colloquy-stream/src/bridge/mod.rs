mod client;

pub use client::HttpAgentClient;
