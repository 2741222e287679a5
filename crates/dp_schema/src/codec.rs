//! Schema-driven transfer between readers and writers.
//!
//! [`transcode`] replays a [`Schema`] against any [`Reader`] and [`Writer`]
//! pair without the type the schema was created from. The walk is an explicit
//! stack machine: container element shapes are token spans that are rewound
//! once per element, so nesting depth is bounded by memory only.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use dp_object::{ConstObject, Object};
use dp_pack::format::{BinaryReader, BinaryWriter, ObjectReader, ObjectWriter};
use dp_pack::{DumpError, LoadError, PackError, Reader, Writer};

use crate::{Schema, Token};

// -----------------------------------------------------------------------------
// tokens_end

/// Returns the position just past the single shape starting at `begin`.
///
/// Prefix tokens (map, list, optional) leave the depth unchanged since they
/// are followed by exactly one nested shape.
///
/// # Errors
///
/// Fails with [`LoadError::InvalidSchema`] if the shape is not closed before
/// the end of `tokens`, or does not start with a shape.
pub fn tokens_end(tokens: &[Token], begin: usize) -> Result<usize, LoadError> {
    let mut pos = begin;
    let mut depth = 0_usize;
    loop {
        let token = tokens.get(pos).ok_or(LoadError::InvalidSchema)?;
        pos += 1;
        match token {
            Token::Map | Token::List | Token::Optional => continue,
            Token::ObjectBegin
            | Token::TupleBegin
            | Token::VariantBegin { .. }
            | Token::BinaryBegin { .. }
            | Token::TrivialBegin { .. } => {
                depth += 1;
                continue;
            }
            Token::ObjectEnd
            | Token::TupleEnd
            | Token::VariantEnd
            | Token::BinaryEnd
            | Token::TrivialEnd { .. } => {
                depth = depth.checked_sub(1).ok_or(LoadError::InvalidSchema)?;
            }
            Token::ObjectNext { .. } | Token::TupleNext | Token::VariantNext { .. }
                if depth == 0 =>
            {
                return Err(LoadError::InvalidSchema);
            }
            _ => {}
        }
        if depth == 0 {
            return Ok(pos);
        }
    }
}

// -----------------------------------------------------------------------------
// transcode

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    /// Plain structure, or the whole schema for the base frame.
    None,
    Map,
    List,
    Optional,
    Variant,
    Binary { stride: usize },
}

/// A container whose element shape is the token span `begin..end`.
#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: FrameKind,
    begin: usize,
    end: usize,
    /// Set once the single value of an optional or variant is entered.
    done: bool,
}

impl Frame {
    #[inline]
    const fn new(kind: FrameKind, begin: usize, end: usize) -> Self {
        Self {
            kind,
            begin,
            end,
            done: false,
        }
    }
}

#[inline]
fn to_usize(value: u64) -> Result<usize, LoadError> {
    usize::try_from(value).map_err(|_| LoadError::OutOfRange("usize"))
}

#[inline]
fn borrowed_labels(labels: &[String]) -> Vec<&str> {
    labels.iter().map(String::as_str).collect()
}

/// Transfers one value from `reader` to `writer`, driven by `schema`.
///
/// Every structural call is forwarded to both sides in lockstep, so that the
/// writer receives the same sequence of calls as if the value had been
/// written from the type the schema describes.
///
/// # Errors
///
/// Fails on the first error of either side, or with
/// [`LoadError::InvalidSchema`] if the schema is malformed. A variant must
/// match exactly one of its labels: none is [`LoadError::NoMatchingVariant`],
/// several is [`LoadError::RepeatedVariantLabels`].
pub fn transcode(
    schema: &Schema,
    reader: &mut dyn Reader,
    writer: &mut dyn Writer,
) -> Result<(), PackError> {
    let tokens = schema.tokens.as_slice();
    let mut frames = vec![Frame::new(FrameKind::None, 0, tokens.len())];
    let mut pos = 0;

    loop {
        let frame = frames.last_mut().ok_or(LoadError::InvalidSchema)?;
        match frame.kind {
            FrameKind::None => {
                if pos >= tokens.len() {
                    if frames.len() == 1 {
                        break;
                    }
                    return Err(LoadError::InvalidSchema.into());
                }
            }
            FrameKind::Map => match reader.map_next()? {
                Some(key) => {
                    writer.map_next(&key)?;
                    pos = frame.begin;
                }
                None => {
                    reader.map_end()?;
                    writer.map_end()?;
                    pos = frame.end;
                    frames.pop();
                    log::trace!("map closed at token {pos}");
                    continue;
                }
            },
            FrameKind::List => {
                if reader.list_next()? {
                    writer.list_next()?;
                    pos = frame.begin;
                } else {
                    reader.list_end()?;
                    writer.list_end()?;
                    pos = frame.end;
                    frames.pop();
                    log::trace!("list closed at token {pos}");
                    continue;
                }
            }
            FrameKind::Optional => {
                if frame.done {
                    pos = frame.end;
                    frames.pop();
                    continue;
                }
                frame.done = true;
                let has_value = reader.optional()?;
                writer.optional(has_value)?;
                if !has_value {
                    pos = frame.end;
                    frames.pop();
                    continue;
                }
                pos = frame.begin;
            }
            FrameKind::Variant => {
                if frame.done {
                    reader.variant_end()?;
                    writer.variant_end()?;
                    pos = frame.end;
                    frames.pop();
                    continue;
                }
                frame.done = true;
                pos = frame.begin;
            }
            FrameKind::Binary { stride } => {
                // The element shape only documents the blob, which moves in one piece.
                let size = reader.binary_size(stride)?;
                let mut data = vec![0; size];
                reader.binary_data(&mut data)?;
                writer.binary(&data, stride)?;
                log::trace!("transferred {size} bytes with stride {stride}");
                pos = frame.end;
                frames.pop();
                continue;
            }
        }

        let token = tokens.get(pos).ok_or(LoadError::InvalidSchema)?;
        pos += 1;

        match token {
            Token::ObjectBegin => {
                reader.object_begin()?;
                writer.object_begin()?;
                frames.push(Frame::new(FrameKind::None, pos, pos));
            }
            Token::ObjectEnd => {
                pop_plain(&mut frames)?;
                reader.object_end()?;
                writer.object_end()?;
            }
            Token::ObjectNext { key } => {
                reader.object_next(key)?;
                writer.object_next(key)?;
            }
            Token::TupleBegin => {
                reader.tuple_begin()?;
                writer.tuple_begin()?;
                frames.push(Frame::new(FrameKind::None, pos, pos));
            }
            Token::TupleEnd => {
                pop_plain(&mut frames)?;
                reader.tuple_end()?;
                writer.tuple_end()?;
            }
            Token::TupleNext => {
                reader.tuple_next()?;
                writer.tuple_next()?;
            }
            Token::TrivialBegin { .. } => {
                frames.push(Frame::new(FrameKind::None, pos, pos));
            }
            Token::TrivialEnd { .. } => {
                pop_plain(&mut frames)?;
            }
            Token::Map => {
                reader.map_begin()?;
                writer.map_begin()?;
                let end = tokens_end(tokens, pos)?;
                frames.push(Frame::new(FrameKind::Map, pos, end));
            }
            Token::List => {
                reader.list_begin()?;
                writer.list_begin()?;
                let end = tokens_end(tokens, pos)?;
                frames.push(Frame::new(FrameKind::List, pos, end));
            }
            Token::Optional => {
                let end = tokens_end(tokens, pos)?;
                frames.push(Frame::new(FrameKind::Optional, pos, end));
            }
            Token::VariantBegin { labels } => {
                let labels = borrowed_labels(labels);
                reader.variant_begin(&labels)?;

                let mut selected = None;
                let mut cursor = pos;
                loop {
                    match tokens.get(cursor) {
                        Some(Token::VariantNext { label }) => {
                            cursor += 1;
                            if reader.variant_match(label)? {
                                if selected.is_some() {
                                    return Err(LoadError::RepeatedVariantLabels.into());
                                }
                                selected = Some((label, cursor));
                            }
                            cursor = tokens_end(tokens, cursor)?;
                        }
                        Some(Token::VariantEnd) => {
                            cursor += 1;
                            break;
                        }
                        _ => return Err(LoadError::InvalidSchema.into()),
                    }
                }

                let (label, begin) = selected.ok_or(LoadError::NoMatchingVariant)?;
                log::trace!("variant `{label}` selected at token {begin}");
                writer.variant_begin(label, &labels)?;
                frames.push(Frame::new(FrameKind::Variant, begin, cursor));
            }
            Token::Enumerate { labels } => {
                let labels = borrowed_labels(labels);
                let index = reader.enumerate(&labels)?;
                writer.enumerate(index, &labels)?;
            }
            Token::Binary => {
                let size = reader.binary_size(0)?;
                let mut data = vec![0; size];
                reader.binary_data(&mut data)?;
                writer.binary(&data, 0)?;
            }
            Token::BinaryBegin { stride } => {
                let stride = to_usize(*stride)?;
                let end = tokens_end(tokens, pos - 1)?;
                frames.push(Frame::new(FrameKind::Binary { stride }, pos, end));
            }
            Token::I32 => writer.value_i32(reader.value_i32()?)?,
            Token::I64 => writer.value_i64(reader.value_i64()?)?,
            Token::U32 => writer.value_u32(reader.value_u32()?)?,
            Token::U64 => writer.value_u64(reader.value_u64()?)?,
            Token::F32 => writer.value_f32(reader.value_f32()?)?,
            Token::F64 => writer.value_f64(reader.value_f64()?)?,
            Token::String => writer.value_string(&reader.value_string()?)?,
            Token::Bool => writer.value_bool(reader.value_bool()?)?,
            Token::VariantNext { .. } | Token::VariantEnd | Token::BinaryEnd => {
                return Err(LoadError::InvalidSchema.into());
            }
        }
    }

    Ok(())
}

/// Pops a plain structural frame, never the base one.
fn pop_plain(frames: &mut Vec<Frame>) -> Result<(), LoadError> {
    match frames.as_slice() {
        [_, .., last] if last.kind == FrameKind::None => {
            frames.pop();
            Ok(())
        }
        _ => Err(LoadError::InvalidSchema),
    }
}

// -----------------------------------------------------------------------------
// decode / encode

/// Decodes binary data into a value tree, using only its schema.
///
/// # Examples
///
/// ```
/// use dp_pack::{pack_object, write_binary, write_object};
/// use dp_schema::{create_schema, decode};
///
/// #[derive(Default)]
/// struct Pose {
///     x: f64,
///     y: f64,
/// }
///
/// pack_object!(Pose { x, y });
///
/// let schema = create_schema::<Vec<Pose>>();
/// let poses = vec![Pose { x: 1.0, y: 2.0 }, Pose { x: 3.0, y: 4.0 }];
/// let bytes = write_binary(&poses).unwrap();
///
/// let tree = decode(&schema, &bytes).unwrap();
/// assert_eq!(tree, write_object(&poses).unwrap());
/// ```
///
/// # Errors
///
/// Besides the errors of [`transcode`], fails with
/// [`LoadError::TrailingBytes`] if `data` is longer than the value.
pub fn decode(schema: &Schema, data: &[u8]) -> Result<Object, PackError> {
    let root = Object::default();
    let mut reader = BinaryReader::new(data);
    let mut writer = ObjectWriter::new(root.clone());

    transcode(schema, &mut reader, &mut writer)?;
    reader.finish()?;
    writer.finish()?;
    Ok(root)
}

/// Encodes a value tree into binary data, using only the schema of the value.
///
/// # Errors
///
/// A tree that does not fit the schema fails with [`DumpError::Mismatch`].
pub fn encode(schema: &Schema, tree: &ConstObject) -> Result<Vec<u8>, PackError> {
    let mut buffer = Vec::new();
    let mut reader = ObjectReader::new(tree.clone());
    let mut writer = BinaryWriter::new(&mut buffer);

    transcode(schema, &mut reader, &mut writer).map_err(|error| match error {
        PackError::Load(error) => PackError::Dump(DumpError::Mismatch(error)),
        other => other,
    })?;
    Ok(buffer)
}
