pub mod app;
pub mod config;
pub mod net;
pub mod proto;
pub mod sim;
pub mod testbed;

#[cfg(test)]
mod test;
