//! Network Control Plane Adapters

mod neutron;

pub use neutron::NeutronClient;
