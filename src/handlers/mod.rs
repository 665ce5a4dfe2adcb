// handlers/mod.rs - HTTP endpoints
//
// accounts: CRUD over the accounts database (/api/accounts[/:id])
// health:   liveness and configuration status (/health)

pub mod accounts;
pub mod health;

pub use health::health;
