//! Comparison tree built from any `Serialize` value
//!
//! Unlike `serde_json::Value`, a [`Node`] keeps the struct and enum names
//! serde hands to the serializer, so comparators can be keyed by type, and
//! it accepts non-string map keys.

use std::fmt;

use serde::ser::{self, Serialize};

use crate::error::{AssertError, Result};

/// Structural view of a serialized value
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// `()` and unit-like values
    Unit,
    Bool(bool),
    /// Any signed integer, widened
    Int(i128),
    /// Any unsigned integer, widened
    UInt(u128),
    Float(f64),
    Char(char),
    Str(String),
    Bytes(Vec<u8>),
    /// `Option::None`
    None,
    /// `Option::Some`
    Some(Box<Node>),
    /// Sequences and plain tuples
    Seq(Vec<Node>),
    /// Map entries in serialization order
    Map(Vec<(Node, Node)>),
    /// Named struct, tuple struct, newtype struct or unit struct
    Struct { name: &'static str, fields: Fields },
    /// Enum variant of any shape
    Variant {
        name: &'static str,
        variant: &'static str,
        fields: Fields,
    },
}

/// Payload of a struct or enum variant
#[derive(Debug, Clone, PartialEq)]
pub enum Fields {
    Unit,
    Newtype(Box<Node>),
    Tuple(Vec<Node>),
    Named(Vec<(&'static str, Node)>),
}

impl Node {
    /// Type name for structs and enums, as reported by serde
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Node::Struct { name, .. } | Node::Variant { name, .. } => Some(*name),
            _ => None,
        }
    }

    /// Look up a named field of a struct or struct variant
    pub fn field(&self, name: &str) -> Option<&Node> {
        match self {
            Node::Struct {
                fields: Fields::Named(fields),
                ..
            }
            | Node::Variant {
                fields: Fields::Named(fields),
                ..
            } => fields.iter().find(|(key, _)| *key == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Inner value of a newtype struct or newtype variant
    pub fn newtype_inner(&self) -> Option<&Node> {
        match self {
            Node::Struct {
                fields: Fields::Newtype(inner),
                ..
            }
            | Node::Variant {
                fields: Fields::Newtype(inner),
                ..
            } => Some(&**inner),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Node::Int(v) => Some(*v),
            Node::UInt(v) => i128::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Float(v) => Some(*v),
            Node::Int(v) => Some(*v as f64),
            Node::UInt(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Unit => write!(f, "()"),
            Node::Bool(v) => write!(f, "{}", v),
            Node::Int(v) => write!(f, "{}", v),
            Node::UInt(v) => write!(f, "{}", v),
            Node::Float(v) => write!(f, "{:?}", v),
            Node::Char(v) => write!(f, "{:?}", v),
            Node::Str(v) => write!(f, "{:?}", v),
            Node::Bytes(v) => write!(f, "{:?}", v),
            Node::None => write!(f, "None"),
            Node::Some(inner) => write!(f, "Some({})", inner),
            Node::Seq(items) => {
                write!(f, "[")?;
                write_joined(f, items.iter())?;
                write!(f, "]")
            }
            Node::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Node::Struct { name, fields } => {
                write!(f, "{}", name)?;
                fmt::Display::fmt(fields, f)
            }
            Node::Variant { name, variant, fields } => {
                write!(f, "{}::{}", name, variant)?;
                fmt::Display::fmt(fields, f)
            }
        }
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fields::Unit => Ok(()),
            Fields::Newtype(inner) => write!(f, "({})", inner),
            Fields::Tuple(items) => {
                write!(f, "(")?;
                write_joined(f, items.iter())?;
                write!(f, ")")
            }
            Fields::Named(fields) => {
                write!(f, " {{ ")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, " }}")
            }
        }
    }
}

fn write_joined<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = &'a Node>,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Build the comparison tree of a value
pub fn to_node<T: Serialize + ?Sized>(value: &T) -> Result<Node> {
    value.serialize(NodeSerializer)
}

/// Serializer producing a [`Node`]
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeSerializer;

impl ser::Serializer for NodeSerializer {
    type Ok = Node;
    type Error = AssertError;

    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = TupleStructBuilder;
    type SerializeTupleVariant = TupleVariantBuilder;
    type SerializeMap = MapBuilder;
    type SerializeStruct = StructBuilder;
    type SerializeStructVariant = StructVariantBuilder;

    fn serialize_bool(self, v: bool) -> Result<Node> {
        Ok(Node::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Node> {
        Ok(Node::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Node> {
        Ok(Node::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Node> {
        Ok(Node::Int(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Node> {
        Ok(Node::Int(v.into()))
    }

    fn serialize_i128(self, v: i128) -> Result<Node> {
        Ok(Node::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Node> {
        Ok(Node::UInt(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Node> {
        Ok(Node::UInt(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Node> {
        Ok(Node::UInt(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Node> {
        Ok(Node::UInt(v.into()))
    }

    fn serialize_u128(self, v: u128) -> Result<Node> {
        Ok(Node::UInt(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Node> {
        Ok(Node::Float(v.into()))
    }

    fn serialize_f64(self, v: f64) -> Result<Node> {
        Ok(Node::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Node> {
        Ok(Node::Char(v))
    }

    fn serialize_str(self, v: &str) -> Result<Node> {
        Ok(Node::Str(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Node> {
        Ok(Node::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Node> {
        Ok(Node::None)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        Ok(Node::Some(Box::new(to_node(value)?)))
    }

    fn serialize_unit(self) -> Result<Node> {
        Ok(Node::Unit)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Node> {
        Ok(Node::Struct {
            name,
            fields: Fields::Unit,
        })
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Node> {
        Ok(Node::Variant {
            name,
            variant,
            fields: Fields::Unit,
        })
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        Ok(Node::Struct {
            name,
            fields: Fields::Newtype(Box::new(to_node(value)?)),
        })
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        Ok(Node::Variant {
            name,
            variant,
            fields: Fields::Newtype(Box::new(to_node(value)?)),
        })
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder> {
        Ok(SeqBuilder {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder> {
        ser::Serializer::serialize_seq(self, Some(len))
    }

    fn serialize_tuple_struct(self, name: &'static str, len: usize) -> Result<TupleStructBuilder> {
        Ok(TupleStructBuilder {
            name,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<TupleVariantBuilder> {
        Ok(TupleVariantBuilder {
            name,
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapBuilder> {
        Ok(MapBuilder {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<StructBuilder> {
        Ok(StructBuilder {
            name,
            fields: Vec::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<StructVariantBuilder> {
        Ok(StructVariantBuilder {
            name,
            variant,
            fields: Vec::with_capacity(len),
        })
    }
}

#[doc(hidden)]
pub struct SeqBuilder {
    items: Vec<Node>,
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = Node;
    type Error = AssertError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Seq(self.items))
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = Node;
    type Error = AssertError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Node> {
        ser::SerializeSeq::end(self)
    }
}

#[doc(hidden)]
pub struct TupleStructBuilder {
    name: &'static str,
    items: Vec<Node>,
}

impl ser::SerializeTupleStruct for TupleStructBuilder {
    type Ok = Node;
    type Error = AssertError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Struct {
            name: self.name,
            fields: Fields::Tuple(self.items),
        })
    }
}

#[doc(hidden)]
pub struct TupleVariantBuilder {
    name: &'static str,
    variant: &'static str,
    items: Vec<Node>,
}

impl ser::SerializeTupleVariant for TupleVariantBuilder {
    type Ok = Node;
    type Error = AssertError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Variant {
            name: self.name,
            variant: self.variant,
            fields: Fields::Tuple(self.items),
        })
    }
}

#[doc(hidden)]
pub struct MapBuilder {
    entries: Vec<(Node, Node)>,
    pending_key: Option<Node>,
}

impl ser::SerializeMap for MapBuilder {
    type Ok = Node;
    type Error = AssertError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.pending_key = Some(to_node(key)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self.pending_key.take().ok_or_else(|| {
            AssertError::Serialize("map value serialized before its key".to_string())
        })?;
        self.entries.push((key, to_node(value)?));
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Map(self.entries))
    }
}

#[doc(hidden)]
pub struct StructBuilder {
    name: &'static str,
    fields: Vec<(&'static str, Node)>,
}

impl ser::SerializeStruct for StructBuilder {
    type Ok = Node;
    type Error = AssertError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.fields.push((key, to_node(value)?));
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Struct {
            name: self.name,
            fields: Fields::Named(self.fields),
        })
    }
}

#[doc(hidden)]
pub struct StructVariantBuilder {
    name: &'static str,
    variant: &'static str,
    fields: Vec<(&'static str, Node)>,
}

impl ser::SerializeStructVariant for StructVariantBuilder {
    type Ok = Node;
    type Error = AssertError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.fields.push((key, to_node(value)?));
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Variant {
            name: self.name,
            variant: self.variant,
            fields: Fields::Named(self.fields),
        })
    }
}
