//! Test utilities for format round-trip testing

use crate::CacheFormat;
use std::fmt::Debug;

/// Build a format instance, parse the bytes back and compare
pub fn test_round_trip<T>(original: &T) -> Result<(), Box<dyn std::error::Error>>
where
    T: CacheFormat + PartialEq + Debug,
{
    let data = original.build()?;
    let parsed = T::parse(&data)?;

    if original != &parsed {
        return Err(format!(
            "Round-trip verification failed:\nOriginal: {original:?}\nParsed: {parsed:?}"
        )
        .into());
    }

    Ok(())
}

/// Parse binary data, rebuild it and check the reparsed value matches
pub fn test_round_trip_with_data<T>(data: &[u8]) -> Result<(), Box<dyn std::error::Error>>
where
    T: CacheFormat + PartialEq + Debug,
{
    let parsed = T::parse(data)?;
    let rebuilt = parsed.build()?;
    let reparsed = T::parse(&rebuilt)?;

    if parsed != reparsed {
        return Err(format!(
            "Round-trip with data failed:\nParsed: {parsed:?}\nReparsed: {reparsed:?}"
        )
        .into());
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    // Lossy on purpose: only the low byte survives a build
    #[derive(Debug, PartialEq)]
    struct LowByte {
        value: u16,
    }

    impl CacheFormat for LowByte {
        fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>> {
            match data {
                [high, low] => Ok(Self {
                    value: u16::from_be_bytes([*high, *low]),
                }),
                _ => Err("Invalid data length".into()),
            }
        }

        fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
            Ok(vec![0, self.value as u8])
        }
    }

    #[test]
    fn test_round_trip_utility() {
        test_round_trip(&LowByte { value: 42 }).expect("Round-trip should succeed");
        assert!(test_round_trip(&LowByte { value: 0x1234 }).is_err());
    }

    #[test]
    fn test_round_trip_with_data_utility() {
        test_round_trip_with_data::<LowByte>(&[0, 7]).expect("Round-trip with data should succeed");
        assert!(test_round_trip_with_data::<LowByte>(&[0]).is_err());
    }

    #[test]
    fn test_verify_round_trip() {
        LowByte::verify_round_trip(&[0, 9]).expect("stable data");
        assert!(LowByte::verify_round_trip(&[1, 9]).is_err());
    }
}
