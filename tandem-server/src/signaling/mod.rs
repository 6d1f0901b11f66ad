mod ws_clients;
mod ws_handler;

pub use ws_clients::WsClients;
pub use ws_handler::{AppState, ws_handler};
