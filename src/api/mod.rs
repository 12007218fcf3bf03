pub mod client;
pub mod http;

#[cfg(test)]
pub(crate) mod fake;
