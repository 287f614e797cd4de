//! # savespec-core
//!
//! Declarative binary layouts for game save data.
//!
//! This crate provides:
//! - A primitive type table (byte, int16, int32, float, double, ...)
//! - Descriptors for sequences, named maps, counted arrays and length-prefixed strings
//! - A compiler that resolves symbolic primitive references up front
//! - A decode engine that reads descriptors from a byte cursor into [`Value`]s
//! - Size calculation for fixed-width records and JSON layout files
//!
//! All multi-byte primitives are little-endian.
//!
//! ## Example
//!
//! ```ignore
//! use savespec_core::{ByteCursor, compile, read_structure};
//! use savespec_core::descriptor::{ordered_map, primitive, string};
//!
//! let header = compile(&ordered_map([
//!     ("version", primitive("int32")),
//!     ("slot_name", string("utf-8")),
//! ]))?;
//!
//! let value = read_structure(&header, &mut ByteCursor::new(&save_bytes))?;
//! ```

pub mod compile;
pub mod config;
pub mod cursor;
pub mod decode;
pub mod descriptor;
pub mod error;
pub mod layout;
pub mod primitive;
pub mod size;
pub mod value;

pub use compile::{compile, compile_with};
pub use config::{DecodeConfig, DecodeConfigBuilder};
pub use cursor::{ByteCursor, ReadCursor};
pub use decode::{Decoder, TextEncoding, read_structure};
pub use descriptor::{CompiledDescriptor, Descriptor, PrimitiveRef};
pub use error::{Error, Result};
pub use layout::{LayoutSet, load_compiled, load_layouts, save_layouts};
pub use primitive::{DecodeFn, PrimitiveTable, PrimitiveType, StandardPrimitive};
pub use size::{exact_size, exact_size_with, fixed_size, fixed_size_with};
pub use value::Value;
