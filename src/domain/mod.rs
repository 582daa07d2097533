// Domain layer: CRM models, view models and ports. No transport code here.

pub mod model;
pub mod ports;
pub mod services;
