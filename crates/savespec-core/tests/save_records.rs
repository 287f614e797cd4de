//! End-to-end decoding of save-file style records.

use savespec_core::descriptor::{
    ordered_map, primitive, sequence, string, string_with_prefix, variable_count,
    variable_count_with_prefix,
};
use savespec_core::{
    ByteCursor, DecodeConfig, Decoder, Error, LayoutSet, PrimitiveTable, ReadCursor,
    StandardPrimitive, Value, compile, exact_size, fixed_size, load_compiled, read_structure,
    save_layouts,
};

fn le(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn character() -> savespec_core::Descriptor {
    ordered_map([
        ("id", primitive("uint32")),
        ("name", string("utf-8")),
        ("level", primitive("int16")),
        ("position", sequence([primitive("float"), primitive("float")])),
        ("inventory", variable_count(primitive("int32"))),
        ("gold", primitive("double")),
    ])
}

fn character_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&7u32.to_le_bytes());
    bytes.extend_from_slice(&5i32.to_le_bytes());
    bytes.extend_from_slice(b"Aerin");
    bytes.extend_from_slice(&12i16.to_le_bytes());
    bytes.extend_from_slice(&1.5f32.to_le_bytes());
    bytes.extend_from_slice(&(-2.0f32).to_le_bytes());
    bytes.extend_from_slice(&le(&[3, 101, 102, 103]));
    bytes.extend_from_slice(&1234.5f64.to_le_bytes());
    bytes
}

#[test]
fn test_decode_character_record() {
    let compiled = compile(&character()).unwrap();
    let bytes = character_bytes();
    let mut cursor = ByteCursor::new(&bytes);

    let value = read_structure(&compiled, &mut cursor).unwrap();

    assert_eq!(cursor.remaining(), 0);
    assert_eq!(value.field("id"), Some(&Value::Int(7)));
    assert_eq!(value.field("name").and_then(Value::as_str), Some("Aerin"));
    assert_eq!(value.field("level"), Some(&Value::Int(12)));
    assert_eq!(
        value.field("position"),
        Some(&Value::Sequence(vec![Value::Float(1.5), Value::Float(-2.0)]))
    );
    assert_eq!(
        value.field("inventory"),
        Some(&Value::Sequence(vec![
            Value::Int(101),
            Value::Int(102),
            Value::Int(103)
        ]))
    );
    assert_eq!(value.field("gold"), Some(&Value::Float(1234.5)));
}

#[test]
fn test_decode_consecutive_records() {
    let slot = compile(&ordered_map([
        ("slot", primitive("ubyte")),
        ("playtime", primitive("uint32")),
    ]))
    .unwrap();
    let bytes = [1u8, 0x10, 0, 0, 0, 2, 0x20, 0, 0, 0];
    let mut cursor = ByteCursor::new(&bytes);

    let first = read_structure(&slot, &mut cursor).unwrap();
    let second = read_structure(&slot, &mut cursor).unwrap();

    assert_eq!(first.to_string(), "{slot: 1, playtime: 16}");
    assert_eq!(second.to_string(), "{slot: 2, playtime: 32}");
    assert_eq!(cursor.position(), 10);
}

#[test]
fn test_decode_at_offset() {
    let record = compile(&sequence([primitive("int32"), primitive("float")])).unwrap();
    let mut bytes = vec![0xAA; 16];
    bytes.extend_from_slice(&42i32.to_le_bytes());
    bytes.extend_from_slice(&3.5f32.to_le_bytes());

    let mut cursor = ByteCursor::at(&bytes, 16).unwrap();
    let value = read_structure(&record, &mut cursor).unwrap();
    assert_eq!(value, Value::Sequence(vec![Value::Int(42), Value::Float(3.5)]));
}

#[test]
fn test_shift_jis_name_with_padding() {
    let desc = compile(&string_with_prefix("shift_jis", primitive("ubyte"))).unwrap();
    // "勇者" followed by NUL padding
    let bytes = [8u8, 0x97, 0x45, 0x8E, 0xD2, 0, 0, 0, 0];
    let decoder = Decoder::with_config(
        PrimitiveTable::standard(),
        DecodeConfig::builder().trim_nul(true).build(),
    );
    let value = decoder
        .read_structure(&desc, &mut ByteCursor::new(&bytes))
        .unwrap();
    assert_eq!(value, Value::String("勇者".to_string()));
}

#[test]
fn test_nested_counts_with_small_prefixes() {
    let grid = variable_count_with_prefix(
        variable_count_with_prefix(primitive("byte"), primitive("ubyte")),
        primitive("uint16"),
    );
    let bytes = [2u8, 0, 3, 1, 2, 3, 0];
    let value = read_structure(&compile(&grid).unwrap(), &mut ByteCursor::new(&bytes)).unwrap();
    assert_eq!(value.to_string(), "[[1, 2, 3], []]");
}

#[test]
fn test_truncated_record_reports_field() {
    let compiled = compile(&character()).unwrap();
    let bytes = character_bytes();
    let truncated = &bytes[..bytes.len() - 4];

    let err = read_structure(&compiled, &mut ByteCursor::new(truncated)).unwrap_err();
    assert!(err.is_decode());
    assert!(err.to_string().starts_with("In field `gold`:"));
}

#[test]
fn test_oversized_inventory_rejected() {
    let compiled = compile(&ordered_map([("inventory", variable_count(primitive("int32")))]))
        .unwrap();
    let bytes = le(&[i32::MAX, 1, 2]);
    let err = read_structure(&compiled, &mut ByteCursor::new(&bytes)).unwrap_err();
    assert!(matches!(err.root(), Error::LengthExceedsBuffer { .. }));
}

#[test]
fn test_failed_compile_yields_no_descriptor() {
    let broken = ordered_map([
        ("ok", primitive("int32")),
        ("bad", variable_count(primitive("nibble"))),
    ]);
    let err = compile(&broken).unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(
        err.to_string(),
        "In field `bad`: Unknown primitive type: nibble"
    );
}

#[test]
fn test_fixed_size_matches_bytes_consumed() {
    let record = ordered_map([
        ("hp", primitive("int16")),
        ("mp", primitive("int16")),
        ("x", primitive("double")),
        ("flags", primitive("byte")),
    ]);
    let size = fixed_size(&record).unwrap();
    assert_eq!(size, 13);
    assert_eq!(exact_size(&record).unwrap(), Some(size));

    let bytes = vec![0u8; size];
    let mut cursor = ByteCursor::new(&bytes);
    read_structure(&compile(&record).unwrap(), &mut cursor).unwrap();
    assert_eq!(cursor.position(), size);
}

#[test]
fn test_resolved_primitives_mix_with_tags() {
    let record = sequence([StandardPrimitive::Int16.into(), primitive("ubyte")]);
    let bytes = [0xFE, 0xFF, 0xFF];
    let value = read_structure(&record, &mut ByteCursor::new(&bytes)).unwrap();
    assert_eq!(value, Value::Sequence(vec![Value::Int(-2), Value::Int(255)]));
}

#[test]
fn test_layout_file_to_decoded_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");

    let mut set = LayoutSet::new();
    set.insert("character", character());
    save_layouts(&path, &set).unwrap();

    let compiled = load_compiled(&path, PrimitiveTable::standard()).unwrap();
    let bytes = character_bytes();
    let value = read_structure(&compiled["character"], &mut ByteCursor::new(&bytes)).unwrap();

    let json = serde_json::to_value(&value).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": 7,
            "name": "Aerin",
            "level": 12,
            "position": [1.5, -2.0],
            "inventory": [101, 102, 103],
            "gold": 1234.5
        })
    );
}
