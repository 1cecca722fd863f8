//! Shared handler state.

use ventas_db::Ledger;

/// Cloned into every handler. The ledger holds only `Arc`s.
#[derive(Debug, Clone)]
pub struct AppState {
    pub ledger: Ledger,
}

impl AppState {
    pub fn new(ledger: Ledger) -> Self {
        AppState { ledger }
    }
}
