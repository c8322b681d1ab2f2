//! Domain layer: the host records this provider touches, the gateway call,
//! provider settings and the ports through which everything external is
//! reached.

pub mod context;
pub mod gateway;
pub mod payment;
pub mod ports;
pub mod settings;
