mod client_sink;
mod relay_service;

pub use client_sink::ClientSink;
pub use relay_service::RelayService;
