#![allow(dead_code)]

use quantedge_batch::{Ohlcv, Price, Timestamp};
use serde::{Deserialize, de::DeserializeOwned};

/// Hourly OHLC bar parsed from the fixture CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct RefBar {
    pub open_time: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Ohlcv for RefBar {
    fn open(&self) -> Price {
        self.open
    }

    fn high(&self) -> Price {
        self.high
    }

    fn low(&self) -> Price {
        self.low
    }

    fn close(&self) -> Price {
        self.close
    }

    fn open_time(&self) -> Timestamp {
        self.open_time
    }
}

/// Reference value with timestamp.
#[derive(Debug, Deserialize)]
pub struct RefValue {
    pub open_time: u64,
    pub expected: f64,
}

/// Reference band triple with timestamp (BB and Keltner).
#[derive(Debug, Deserialize)]
pub struct RefBands {
    pub open_time: u64,
    pub upper: f64,
    #[serde(alias = "basic")]
    pub middle: f64,
    pub lower: f64,
}

/// Reference PSAR row with timestamp.
#[derive(Debug, Deserialize)]
pub struct RefPsar {
    pub open_time: u64,
    pub psar: f64,
    pub trend: String,
}

const OHLC_PATH: &str = "tests/fixtures/data/synthetic-1h.csv";

/// Load the reference OHLC bars.
pub fn load_reference_ohlcs() -> Vec<RefBar> {
    load_records(OHLC_PATH, "invalid OHLC record")
}

/// Load single-value reference data (RSI).
pub fn load_ref_values(path: &str) -> Vec<RefValue> {
    load_records(path, "invalid reference record")
}

/// Load band reference data (upper, middle/basic, lower).
pub fn load_bands_ref(path: &str) -> Vec<RefBands> {
    load_records(path, "invalid band reference record")
}

/// Load PSAR reference data.
pub fn load_psar_ref(path: &str) -> Vec<RefPsar> {
    load_records(path, "invalid PSAR reference record")
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
