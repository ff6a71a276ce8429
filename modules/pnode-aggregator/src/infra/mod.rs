pub mod credits;
pub mod geolocation;
pub mod pod;
pub mod poller;
pub mod resilient;
pub mod rpc;
pub mod seed;
