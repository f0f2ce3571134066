#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for config entries stored in an archive
//!
//! Definitions are written to an in-memory archive as `.dat`/`.idx` pairs
//! and decoded back through the archive lookup contract.

use bytes::Bytes;
use pretty_assertions::assert_eq;
use rscache_formats::archive::{Archive, ArchiveEntries, ArchiveError};
use rscache_formats::config::{
    BitVariable, BitVariableDefinition, ConfigDecoder, ConfigDefinition, ConfigEncoder,
    ConfigError, IdentityKitDefinition, ParameterVariableDefinition, Part, data_entry_name,
    index_entry_name,
};

fn sample_kits() -> Vec<IdentityKitDefinition> {
    let mut hair = IdentityKitDefinition::with_defaults(0);
    hair.set_part(Part::MaleHair);
    hair.set_models(vec![230]);
    hair.properties_mut().set_value(3, true);

    let plain = IdentityKitDefinition::with_defaults(1);

    let mut torso = IdentityKitDefinition::with_defaults(2);
    torso.set_part(Part::FemaleTorso);
    torso.set_models(vec![421, 422, 423]);
    assert!(torso.set_recolour(1, 6798, 8741));
    torso.properties_mut().set_value(61, 7);

    vec![hair, plain, torso]
}

#[test]
fn config_entry_names() {
    assert_eq!(data_entry_name::<IdentityKitDefinition>(), "idk.dat");
    assert_eq!(index_entry_name::<BitVariableDefinition>(), "varbit.idx");
    assert_eq!(data_entry_name::<ParameterVariableDefinition>(), "varp.dat");
}

#[test]
fn identity_kits_round_trip_through_archive() {
    let kits = sample_kits();
    let mut archive = Archive::new();
    ConfigEncoder::write(&mut archive, &kits).expect("write");

    assert!(archive.contains("idk.dat"));
    assert!(archive.contains("idk.idx"));

    let decoded: Vec<IdentityKitDefinition> = ConfigDecoder::decode(&archive).expect("decode");
    assert_eq!(decoded, kits);

    let torso = &decoded[2];
    assert_eq!(torso.id(), 2);
    assert_eq!(torso.part(), Part::FemaleTorso);
    assert_eq!(torso.models(), Some(&[421u16, 422, 423][..]));
    assert_eq!(torso.original_colour(1), Some(6798));
    assert_eq!(torso.replacement_colour(1), Some(8741));
    assert_eq!(torso.head_model(1), Some(-1));
    assert_eq!(torso.head_model(2), Some(7));
    assert!(!torso.player_design_style());
}

#[test]
fn index_entry_lists_record_sizes() {
    let kits = sample_kits();
    let encoded = ConfigEncoder::encode(&kits).expect("encode");

    let mut index = encoded.index.clone();
    assert_eq!(index.len(), 2 + 2 * kits.len());

    let count = u16::from_be_bytes([index[0], index[1]]);
    assert_eq!(usize::from(count), kits.len());
    let _ = index.split_to(2);

    let sizes: Vec<usize> = index
        .chunks_exact(2)
        .map(|pair| usize::from(u16::from_be_bytes([pair[0], pair[1]])))
        .collect();
    let expected: Vec<usize> = kits
        .iter()
        .map(|kit| kit.encode().expect("encode").len())
        .collect();
    assert_eq!(sizes, expected);

    // Defaults-only kit encodes to the terminator alone
    assert_eq!(sizes[1], 1);
    assert_eq!(encoded.data.len(), 2 + sizes.iter().sum::<usize>());
}

#[test]
fn missing_entry_is_not_truncation() {
    let archive = Archive::new();
    let err = ConfigDecoder::decode::<IdentityKitDefinition>(&archive).expect_err("no entry");

    match err {
        ConfigError::Archive(ArchiveError::EntryNotFound(name)) => assert_eq!(name, "idk.dat"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn truncated_data_entry_fails() {
    let mut archive = Archive::new();
    // Claims two records but holds one
    archive.insert("varp.dat", vec![0x00, 0x02, 5, 0x00, 0x01, 0]);

    let err = ConfigDecoder::decode::<ParameterVariableDefinition>(&archive)
        .expect_err("second record is missing");
    assert!(matches!(err, ConfigError::TruncatedRecord { .. }));
    assert!(err.is_format_error());
}

#[test]
fn variables_decode_from_raw_entries() {
    let varbits: Vec<BitVariableDefinition> = ConfigDecoder::decode_data(Bytes::from_static(&[
        0x00, 0x02, // count
        1, 0x00, 0x10, 0, 3, 0, // varbit 0: varp 16, bits 0..=3
        0, // varbit 1: defaults
    ]))
    .expect("decode");

    assert_eq!(varbits.len(), 2);
    assert_eq!(varbits[0].variable(), BitVariable::new(16, 0, 3));
    assert_eq!(varbits[1].variable(), BitVariable::default());

    let mut varp = ParameterVariableDefinition::with_defaults(16);
    varp.set_parameter(0x1234);
    let parameter = varp.parameter() as u32;
    assert_eq!(varbits[0].variable().extract(parameter), 0x4);
}

#[test]
fn custom_archive_contract() {
    struct Single(&'static str, Bytes);

    impl ArchiveEntries for Single {
        fn entry(&self, name: &str) -> Result<Bytes, ArchiveError> {
            if name == self.0 {
                Ok(self.1.clone())
            } else {
                Err(ArchiveError::EntryNotFound(name.to_string()))
            }
        }
    }

    let source = Single("varp.dat", Bytes::from_static(&[0x00, 0x01, 5, 0x00, 0x2A, 0]));
    let varps: Vec<ParameterVariableDefinition> =
        ConfigDecoder::decode(&source).expect("decode");
    assert_eq!(varps[0].parameter(), 42);
}

#[test]
fn oversized_model_list_aborts_entry_encoding() {
    let mut kits = sample_kits();
    kits[1].set_models((0..=255).collect());

    let mut archive = Archive::new();
    let err = ConfigEncoder::write(&mut archive, &kits).expect_err("list is too long");
    assert!(matches!(err, ConfigError::ListTooLong { length: 256, .. }));
    assert!(!archive.contains("idk.dat"));
    assert!(!archive.contains("idk.idx"));
}
