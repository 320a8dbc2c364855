pub mod controller;
pub mod error;
pub mod gateway;

pub use controller::{GatewaySettings, InitializePaymentRequest, PaymentFlowController};
pub use error::PaymentError;
pub use gateway::ChapaClient;
