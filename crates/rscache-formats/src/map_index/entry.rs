//! One map index record

use binrw::{BinRead, BinWrite};

/// A map square: its packed region id and the files holding its data
///
/// Stored as seven big-endian bytes:
///
/// ```text
/// area: u16, map: u16, object: u16, members: u8
/// ```
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[brw(big)]
pub struct MapIndexEntry {
    /// Packed region coordinates, `(x << 8) | y`
    pub area: u16,
    /// File id of the terrain data
    pub map: u16,
    /// File id of the object placements
    pub object: u16,
    /// Whether the region is members-only
    #[br(map = |flag: u8| flag != 0)]
    #[bw(map = |members: &bool| u8::from(*members))]
    pub members: bool,
}

impl MapIndexEntry {
    /// Encoded size of one record in bytes
    pub const SIZE: usize = 7;

    /// Region x coordinate
    pub fn region_x(&self) -> u8 {
        (self.area >> 8) as u8
    }

    /// Region y coordinate
    pub fn region_y(&self) -> u8 {
        (self.area & 0xFF) as u8
    }

    /// Pack region coordinates into an area id
    pub fn area_id(x: u8, y: u8) -> u16 {
        (u16::from(x) << 8) | u16::from(y)
    }
}
