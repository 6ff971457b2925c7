mod client;

pub use client::ScryfallClient;
