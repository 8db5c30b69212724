pub mod router;

#[cfg(feature = "csr")]
pub mod browser;
