//! Domain layer: invoices, money, the payment contract and the ports the
//! application layer depends on.

pub mod invoice;
pub mod money;
pub mod payment;
pub mod ports;
