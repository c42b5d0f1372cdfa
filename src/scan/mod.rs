mod client;
mod model;

pub use client::{ScanApi, ScanClient};
#[cfg(test)]
pub use client::MockScanApi;
pub use model::{DeepScanEntry, DeepScanResult, ScanCategory, ScanRequest, ScanResult};
