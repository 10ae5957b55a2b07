//! Wire Encoding Module
//!
//! How a cached value is turned into the bytes a remote store keeps.
//! Strings and byte buffers go out untouched and numbers as decimal text,
//! so other readers of the store see the value itself. Structured values
//! opt into JSON through the [`Json`] wrapper.

use serde::Serialize;

use crate::error::StoreError;

/// A value that can be written to a remote store.
pub trait WireValue {
    /// Encodes the value into the bytes stored remotely.
    fn to_wire(&self) -> Result<Vec<u8>, StoreError>;
}

impl WireValue for String {
    fn to_wire(&self) -> Result<Vec<u8>, StoreError> {
        Ok(self.as_bytes().to_vec())
    }
}

impl WireValue for &'static str {
    fn to_wire(&self) -> Result<Vec<u8>, StoreError> {
        Ok(self.as_bytes().to_vec())
    }
}

impl WireValue for Vec<u8> {
    fn to_wire(&self) -> Result<Vec<u8>, StoreError> {
        Ok(self.clone())
    }
}

macro_rules! decimal_wire_value {
    ($($ty:ty),*) => {
        $(
            impl WireValue for $ty {
                fn to_wire(&self) -> Result<Vec<u8>, StoreError> {
                    Ok(self.to_string().into_bytes())
                }
            }
        )*
    };
}

decimal_wire_value!(i32, i64, u32, u64, f64, bool);

/// Wrapper storing a structured value as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Json<T>(pub T);

impl<T: Serialize> WireValue for Json<T> {
    fn to_wire(&self) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(&self.0)?)
    }
}
