pub mod error;
pub mod net;
pub mod proto;
pub mod sim;
pub mod trace;

#[cfg(test)]
mod test;
