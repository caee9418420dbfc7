//! Full serialization round-trip checks: scalars, strings, lists, optional
//! fields, nested composite records, polymorphic dispatch, and the
//! malformed-input error paths.
use std::collections::BTreeMap;

use picowire::{
    ByteBuffer, Decode, Decoder, DynamicList, Encode, Encoder, Fixed32, Fixed64, Polymorphic,
    TypeRegistry, WireResult, decode, encode,
};

fn roundtrip<T: Encode + Decode + PartialEq + std::fmt::Debug>(value: T) {
    let mut buf = ByteBuffer::new();
    encode(&value, &mut buf).unwrap();
    let back: T = decode(&mut buf).unwrap();
    assert_eq!(back, value);
    assert_eq!(buf.remaining(), 0, "decode must consume the whole encoding");
}

#[test]
fn scalar_roundtrip_at_boundaries() {
    roundtrip(true);
    roundtrip(false);
    for v in [i8::MIN, -1, 0, 1, i8::MAX] {
        roundtrip(v);
    }
    for v in [i16::MIN, -1, 0, 1, i16::MAX] {
        roundtrip(v);
    }
    for v in [i32::MIN, -1, 0, 1, i32::MAX] {
        roundtrip(v);
    }
    for v in [i64::MIN, -1, 0, 1, i64::MAX] {
        roundtrip(v);
    }
    roundtrip(f32::MAX);
    roundtrip(-0.5f64);
    roundtrip(String::new());
    roundtrip(String::from("composite \u{1F980}"));
}

#[test]
fn fixed_width_wrappers_occupy_full_width() {
    let mut buf = ByteBuffer::new();
    encode(&Fixed32(1), &mut buf).unwrap();
    assert_eq!(buf.write_pos(), 4);
    encode(&Fixed64(1), &mut buf).unwrap();
    assert_eq!(buf.write_pos(), 12);
    assert_eq!(decode::<Fixed32>(&mut buf).unwrap(), Fixed32(1));
    assert_eq!(decode::<Fixed64>(&mut buf).unwrap(), Fixed64(1));
}

#[test]
fn list_roundtrip() {
    roundtrip(DynamicList::<i32>::new());
    roundtrip(DynamicList::from(vec![42i32]));
    roundtrip((0..10_000).collect::<DynamicList<i32>>());
    roundtrip(vec![String::from("a"), String::new(), String::from("c")]);
}

#[test]
fn optional_layout_and_roundtrip() {
    roundtrip(Option::<String>::None);
    roundtrip(Some(String::from("present")));

    // Absent is exactly one sentinel byte.
    let mut buf = ByteBuffer::new();
    encode(&Option::<i32>::None, &mut buf).unwrap();
    assert_eq!(buf.as_slice(), &[0x00]);

    let mut buf = ByteBuffer::new();
    encode(&Some(0i32), &mut buf).unwrap();
    assert_eq!(buf.as_slice(), &[0x01, 0x00]);
}

#[test]
fn map_roundtrip() {
    let mut map = BTreeMap::new();
    map.insert(String::from("one"), 1i32);
    map.insert(String::from("two"), 2i32);
    roundtrip(map);
    roundtrip(BTreeMap::<i64, String>::new());
}

// A record containing a list of records, each with an optional field —
// the canonical nested-composite shape.

#[derive(Debug, Clone, PartialEq)]
struct Item {
    label: Option<String>,
    qty: i32,
}

impl Encode for Item {
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        enc.nested(|enc| {
            self.label.encode(enc)?;
            self.qty.encode(enc)
        })
    }
}

impl Decode for Item {
    fn decode(dec: &mut Decoder<'_>) -> WireResult<Self> {
        dec.nested(|dec| {
            Ok(Item {
                label: Option::decode(dec)?,
                qty: i32::decode(dec)?,
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Order {
    id: i64,
    checksum: Fixed32,
    items: DynamicList<Item>,
    note: Option<String>,
}

impl Encode for Order {
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        enc.nested(|enc| {
            self.id.encode(enc)?;
            self.checksum.encode(enc)?;
            self.items.encode(enc)?;
            self.note.encode(enc)
        })
    }
}

impl Decode for Order {
    fn decode(dec: &mut Decoder<'_>) -> WireResult<Self> {
        dec.nested(|dec| {
            Ok(Order {
                id: i64::decode(dec)?,
                checksum: Fixed32::decode(dec)?,
                items: DynamicList::decode(dec)?,
                note: Option::decode(dec)?,
            })
        })
    }
}

fn sample_order() -> Order {
    let items = DynamicList::from(vec![
        Item {
            label: Some(String::from("bolts")),
            qty: 12,
        },
        Item {
            label: None,
            qty: -1,
        },
        Item {
            label: Some(String::new()),
            qty: i32::MAX,
        },
    ]);
    Order {
        id: -987654321,
        checksum: Fixed32(0x5A5A5A5A),
        items,
        note: None,
    }
}

#[test]
fn nested_composite_roundtrip() {
    roundtrip(sample_order());
}

#[test]
fn truncated_record_fails_with_underflow() {
    let mut intact = ByteBuffer::new();
    encode(&sample_order(), &mut intact).unwrap();
    let bytes = intact.as_slice();
    // Cutting anywhere inside the encoding must surface an error, never a
    // silently wrong value.
    for cut in 0..bytes.len() {
        let mut buf = ByteBuffer::from(&bytes[..cut]);
        let err = decode::<Order>(&mut buf).unwrap_err();
        assert!(
            err.is_buffer_underflow() || err.is_malformed_var_int(),
            "cut at {cut}: unexpected error {err:?}"
        );
    }
}

// Polymorphic dispatch: two concrete shapes behind one tag registry.

const TAG_CIRCLE: i32 = 1;
const TAG_RECT: i32 = 2;

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Circle { radius: i32 },
    Rect { width: i32, height: i32 },
}

impl Encode for Shape {
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        enc.nested(|enc| match self {
            Shape::Circle { radius } => radius.encode(enc),
            Shape::Rect { width, height } => {
                width.encode(enc)?;
                height.encode(enc)
            }
        })
    }
}

impl Polymorphic for Shape {
    fn type_tag(&self) -> i32 {
        match self {
            Shape::Circle { .. } => TAG_CIRCLE,
            Shape::Rect { .. } => TAG_RECT,
        }
    }
}

fn decode_circle(dec: &mut Decoder<'_>) -> WireResult<Shape> {
    dec.nested(|dec| {
        Ok(Shape::Circle {
            radius: i32::decode(dec)?,
        })
    })
}

fn decode_rect(dec: &mut Decoder<'_>) -> WireResult<Shape> {
    dec.nested(|dec| {
        Ok(Shape::Rect {
            width: i32::decode(dec)?,
            height: i32::decode(dec)?,
        })
    })
}

fn shape_registry() -> TypeRegistry<Shape> {
    let mut registry = TypeRegistry::new();
    registry.register(TAG_CIRCLE, decode_circle);
    registry.register(TAG_RECT, decode_rect);
    registry
}

#[test]
fn polymorphic_dispatch_roundtrip() {
    let registry = shape_registry();
    let shapes = [
        Shape::Circle { radius: 7 },
        Shape::Rect {
            width: 3,
            height: 4,
        },
        Shape::Circle { radius: -1 },
    ];

    let mut buf = ByteBuffer::new();
    let mut enc = Encoder::new(&mut buf);
    for shape in &shapes {
        enc.write_tagged(shape).unwrap();
    }

    let mut dec = Decoder::new(&mut buf);
    for shape in &shapes {
        assert_eq!(&registry.decode(&mut dec).unwrap(), shape);
    }
}

#[test]
fn unknown_tag_is_rejected() {
    let registry = shape_registry();
    let mut buf = ByteBuffer::new();
    buf.write_var_i32(99);
    let mut dec = Decoder::new(&mut buf);
    let err = registry.decode(&mut dec).unwrap_err();
    assert!(err.is_unknown_type_tag());
    assert!(!registry.contains(99));
    assert_eq!(registry.len(), 2);
}

// Depth guarding on a self-referential record.

#[derive(Debug, PartialEq)]
struct Chain {
    next: Option<Box<Chain>>,
}

impl Chain {
    fn of_depth(depth: usize) -> Chain {
        let mut node = Chain { next: None };
        for _ in 1..depth {
            node = Chain {
                next: Some(Box::new(node)),
            };
        }
        node
    }
}

impl Encode for Chain {
    fn encode(&self, enc: &mut Encoder<'_>) -> WireResult<()> {
        enc.nested(|enc| self.next.encode(enc))
    }
}

impl Decode for Chain {
    fn decode(dec: &mut Decoder<'_>) -> WireResult<Self> {
        dec.nested(|dec| {
            Ok(Chain {
                next: Option::decode(dec)?,
            })
        })
    }
}

#[test]
fn depth_within_limit_roundtrips() {
    roundtrip(Chain::of_depth(60));
}

#[test]
fn encode_depth_limit_is_enforced() {
    let deep = Chain::of_depth(100);
    let mut buf = ByteBuffer::new();
    let err = encode(&deep, &mut buf).unwrap_err();
    assert!(err.is_max_depth_exceeded());
}

#[test]
fn decode_depth_limit_is_injectable() {
    let value = Chain::of_depth(20);
    let mut buf = ByteBuffer::new();
    encode(&value, &mut buf).unwrap();

    let mut dec = Decoder::with_max_depth(&mut buf, 10);
    let err = Chain::decode(&mut dec).unwrap_err();
    assert!(err.is_max_depth_exceeded());
    assert_eq!(err.to_string(), "maximum nesting depth 10 exceeded");
}

#[test]
fn negative_list_count_is_rejected() {
    let mut buf = ByteBuffer::new();
    buf.write_var_i32(-5);
    let err = decode::<DynamicList<i32>>(&mut buf).unwrap_err();
    assert!(err.is_invalid_length());
}

#[test]
fn field_order_is_the_wire_contract() {
    // An Item encodes as: presence flag, label bytes, then qty. Decoding the
    // same bytes as a different field order would scramble the value, so the
    // layout itself is asserted here.
    let item = Item {
        label: Some(String::from("ab")),
        qty: 1,
    };
    let mut buf = ByteBuffer::new();
    encode(&item, &mut buf).unwrap();
    assert_eq!(buf.as_slice(), &[0x01, 0x04, b'a', b'b', 0x02]);
}
