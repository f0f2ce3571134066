//! Map index decoding and building
//!
//! The `map_index` entry of the versions archive lists every map square the
//! client can load, as a flat run of 7-byte records with no header. The
//! record count is implied by the entry length; trailing bytes that do not
//! form a whole record are ignored.
//!
//! ```
//! use rscache_formats::map_index::MapIndex;
//!
//! let index = MapIndex::decode(&[0x32, 0x32, 0x00, 0x01, 0x00, 0x02, 0x00, 0xFF])?;
//! assert_eq!(index.len(), 1);
//! assert_eq!(index.find_by_area(0x3232).map(|entry| entry.object), Some(2));
//! # Ok::<(), rscache_formats::map_index::MapIndexError>(())
//! ```

mod entry;
mod error;

pub use entry::MapIndexEntry;
pub use error::{MapIndexError, Result};

use crate::CacheFormat;
use crate::archive::ArchiveEntries;
use binrw::{BinRead, BinWrite};
use std::io::Cursor;
use tracing::{debug, warn};

/// Name of the archive entry holding the map index
pub const ENTRY_NAME: &str = "map_index";

/// Decoded map index
///
/// Records are held as four parallel columns; index `i` of each column
/// belongs to the same map square.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapIndex {
    areas: Vec<u16>,
    maps: Vec<u16>,
    objects: Vec<u16>,
    members: Vec<bool>,
}

impl MapIndex {
    /// Create an empty map index
    pub fn new() -> Self {
        Self::default()
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            areas: Vec::with_capacity(capacity),
            maps: Vec::with_capacity(capacity),
            objects: Vec::with_capacity(capacity),
            members: Vec::with_capacity(capacity),
        }
    }

    /// Decode `floor(len / 7)` records from raw entry data
    pub fn decode(data: &[u8]) -> Result<Self> {
        let count = data.len() / MapIndexEntry::SIZE;
        let trailing = data.len() % MapIndexEntry::SIZE;
        if trailing != 0 {
            warn!(
                count,
                trailing, "map index has a partial trailing record, ignoring it"
            );
        }

        let mut cursor = Cursor::new(&data[..count * MapIndexEntry::SIZE]);
        let mut index = Self::with_capacity(count);
        for _ in 0..count {
            index.push(MapIndexEntry::read(&mut cursor)?);
        }

        debug!(count, "decoded map index");
        Ok(index)
    }

    /// Decode the `map_index` entry of an archive
    pub fn from_archive(archive: &impl ArchiveEntries) -> Result<Self> {
        let data = archive.entry(ENTRY_NAME)?;
        Self::decode(&data)
    }

    /// Encode every record in order
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::with_capacity(self.len() * MapIndexEntry::SIZE));
        for entry in self.entries() {
            entry.write(&mut cursor)?;
        }
        Ok(cursor.into_inner())
    }

    /// Append a record
    pub fn push(&mut self, entry: MapIndexEntry) {
        self.areas.push(entry.area);
        self.maps.push(entry.map);
        self.objects.push(entry.object);
        self.members.push(entry.members);
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// Whether the index has no records
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Packed region ids, one per record
    pub fn areas(&self) -> &[u16] {
        &self.areas
    }

    /// Terrain file ids, one per record
    pub fn maps(&self) -> &[u16] {
        &self.maps
    }

    /// Object file ids, one per record
    pub fn objects(&self) -> &[u16] {
        &self.objects
    }

    /// Members-only flags, one per record
    pub fn members(&self) -> &[bool] {
        &self.members
    }

    /// Record at `position`
    pub fn get(&self, position: usize) -> Option<MapIndexEntry> {
        Some(MapIndexEntry {
            area: *self.areas.get(position)?,
            map: *self.maps.get(position)?,
            object: *self.objects.get(position)?,
            members: *self.members.get(position)?,
        })
    }

    /// Records in order
    pub fn entries(&self) -> impl Iterator<Item = MapIndexEntry> + '_ {
        (0..self.len()).filter_map(|position| self.get(position))
    }

    /// First record for a packed region id
    pub fn find_by_area(&self, area: u16) -> Option<MapIndexEntry> {
        self.find(&self.areas, area)
    }

    /// First record for a region given by coordinates
    pub fn find_by_region(&self, x: u8, y: u8) -> Option<MapIndexEntry> {
        self.find_by_area(MapIndexEntry::area_id(x, y))
    }

    /// First record whose terrain file is `map`
    pub fn find_by_map(&self, map: u16) -> Option<MapIndexEntry> {
        self.find(&self.maps, map)
    }

    /// First record whose object file is `object`
    pub fn find_by_object(&self, object: u16) -> Option<MapIndexEntry> {
        self.find(&self.objects, object)
    }

    fn find(&self, column: &[u16], value: u16) -> Option<MapIndexEntry> {
        let position = column.iter().position(|&candidate| candidate == value)?;
        self.get(position)
    }
}

impl FromIterator<MapIndexEntry> for MapIndex {
    fn from_iter<I: IntoIterator<Item = MapIndexEntry>>(iter: I) -> Self {
        let mut index = Self::new();
        for entry in iter {
            index.push(entry);
        }
        index
    }
}

impl CacheFormat for MapIndex {
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::decode(data)?)
    }

    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>> {
        Ok(Self::build(self)?)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::CacheFormat;
    use crate::archive::{Archive, ArchiveError};
    use crate::test_utils::{test_round_trip, test_round_trip_with_data};
    use pretty_assertions::assert_eq;

    fn sample() -> MapIndex {
        [
            MapIndexEntry {
                area: MapIndexEntry::area_id(50, 50),
                map: 100,
                object: 101,
                members: false,
            },
            MapIndexEntry {
                area: MapIndexEntry::area_id(48, 148),
                map: 200,
                object: 201,
                members: true,
            },
            MapIndexEntry {
                area: MapIndexEntry::area_id(50, 51),
                map: 300,
                object: 301,
                members: false,
            },
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_decode_columns() {
        let data = [
            0x32, 0x32, 0x00, 0x64, 0x00, 0x65, 0x00, //
            0x30, 0x94, 0x00, 0xC8, 0x00, 0xC9, 0x01,
        ];
        let index = MapIndex::decode(&data).expect("decode");

        assert_eq!(index.len(), 2);
        assert_eq!(index.areas(), &[0x3232, 0x3094]);
        assert_eq!(index.maps(), &[100, 200]);
        assert_eq!(index.objects(), &[101, 201]);
        assert_eq!(index.members(), &[false, true]);
    }

    #[test]
    fn test_partial_record_is_ignored() {
        let full = sample().build().expect("build");
        for trailing in 1..MapIndexEntry::SIZE {
            let mut data = full.clone();
            data.extend(std::iter::repeat_n(0xAB, trailing));
            let index = MapIndex::decode(&data).expect("decode");
            assert_eq!(index, sample(), "{trailing} trailing bytes");
        }
    }

    #[test]
    fn test_short_data_is_empty() {
        assert!(MapIndex::decode(&[]).expect("decode").is_empty());
        assert!(MapIndex::decode(&[1, 2, 3, 4, 5, 6]).expect("decode").is_empty());
    }

    #[test]
    fn test_lookups() {
        let index = sample();

        let lumbridge = index.find_by_region(50, 50).expect("region");
        assert_eq!(lumbridge.map, 100);
        assert_eq!(lumbridge.region_x(), 50);

        assert_eq!(index.find_by_map(200).map(|entry| entry.area), Some(0x3094));
        assert_eq!(index.find_by_object(301).map(|entry| entry.map), Some(300));
        assert_eq!(index.find_by_area(0xFFFF), None);
        assert_eq!(index.get(3), None);
        assert_eq!(index.entries().filter(|entry| entry.members).count(), 1);
    }

    #[test]
    fn test_build_round_trip() {
        let index = sample();
        let data = index.build().expect("build");
        assert_eq!(data.len(), 3 * MapIndexEntry::SIZE);
        assert_eq!(&data[..7], &[0x32, 0x32, 0x00, 0x64, 0x00, 0x65, 0x00]);

        test_round_trip(&index).expect("round trip");
        test_round_trip_with_data::<MapIndex>(&data).expect("round trip with data");
        MapIndex::verify_round_trip(&data).expect("verify");
    }

    #[test]
    fn test_from_archive() {
        let mut archive = Archive::new();
        assert!(matches!(
            MapIndex::from_archive(&archive),
            Err(MapIndexError::Archive(ArchiveError::EntryNotFound(_)))
        ));

        archive.insert(ENTRY_NAME, sample().build().expect("build"));
        assert_eq!(MapIndex::from_archive(&archive).expect("load"), sample());
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;
    use proptest::test_runner::TestCaseError;

    fn map_index_entry() -> impl Strategy<Value = MapIndexEntry> {
        (any::<u16>(), any::<u16>(), any::<u16>(), any::<bool>()).prop_map(
            |(area, map, object, members)| MapIndexEntry {
                area,
                map,
                object,
                members,
            },
        )
    }

    proptest! {
        /// Built records decode back, whatever partial record follows them
        #[test]
        fn map_index_floor_round_trip(
            entries in prop::collection::vec(map_index_entry(), 0..64),
            trailing in prop::collection::vec(any::<u8>(), 0..MapIndexEntry::SIZE),
        ) {
            let index: MapIndex = entries.iter().copied().collect();
            let mut data = index.build().map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(data.len(), entries.len() * MapIndexEntry::SIZE);

            data.extend_from_slice(&trailing);
            let decoded = MapIndex::decode(&data).map_err(|e| TestCaseError::fail(e.to_string()))?;

            prop_assert_eq!(decoded.len(), entries.len());
            prop_assert_eq!(decoded.entries().collect::<Vec<_>>(), entries);
        }
    }
}
