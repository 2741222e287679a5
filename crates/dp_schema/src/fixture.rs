//! A scene entity touching every kind of shape, and the end-to-end checks
//! built on it.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use dp_object::{Object, Value};
use dp_pack::{
    LoadError, PackError, Packed, labelled_enum, labelled_variant, pack_object, write_binary,
    write_object,
};

use crate::{Schema, Token, create_schema, decode, encode};

// -----------------------------------------------------------------------------
// Types

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) enum Physics {
    #[default]
    Dynamic,
    Kinematic,
    Static,
}

labelled_enum!(Physics {
    Dynamic => "dynamic",
    Kinematic => "kinematic",
    Static => "static",
});

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Circle {
    pub radius: f64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Rect {
    pub width: f64,
    pub height: f64,
}

pack_object!(Circle { radius });
pack_object!(Rect { width, height });

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Shape {
    Circle(Circle),
    Rect(Rect),
}

impl Default for Shape {
    fn default() -> Self {
        Shape::Circle(Circle::default())
    }
}

labelled_variant!(Shape {
    Circle(Circle) => "circle",
    Rect(Rect) => "rect",
});

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Pose {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

pack_object!(Pose { x, y, angle });

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Pixel {
    pub r: u32,
    pub g: u32,
    pub b: u32,
}

pack_object!(Pixel { r, g, b });

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Sprite {
    pub width: i32,
    pub height: i32,
    pub pixels: Packed<Pixel>,
}

pack_object!(Sprite {
    width,
    height,
    pixels,
});

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Item {
    pub name: String,
    pub count: u64,
    pub tint: Option<[f32; 3]>,
}

pack_object!(Item { name, count, tint });

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Entity {
    pub index: i64,
    pub name: String,
    pub enabled: bool,
    pub pose: Pose,
    pub physics: Physics,
    pub shape: Shape,
    pub sprite: Sprite,
    pub items: Vec<Item>,
    pub properties: BTreeMap<String, f32>,
    pub parent: Option<String>,
    pub slots: (u32, Option<i32>),
}

pack_object!(Entity {
    index,
    name,
    enabled,
    pose,
    physics,
    shape,
    sprite,
    items,
    properties,
    parent,
    slots,
});

pub(crate) fn entity() -> Entity {
    let mut properties = BTreeMap::new();
    properties.insert(String::from("mass"), 2.5);
    properties.insert(String::from("friction"), 0.25);

    Entity {
        index: -7,
        name: String::from("player"),
        enabled: true,
        pose: Pose {
            x: 1.0,
            y: -2.0,
            angle: 0.5,
        },
        physics: Physics::Kinematic,
        shape: Shape::Rect(Rect {
            width: 2.0,
            height: 4.0,
        }),
        sprite: Sprite {
            width: 2,
            height: 1,
            pixels: Packed(vec![Pixel { r: 255, g: 0, b: 0 }, Pixel { r: 0, g: 255, b: 9 }]),
        },
        items: vec![
            Item {
                name: String::from("sword"),
                count: 1,
                tint: Some([0.5, 0.25, 1.0]),
            },
            Item {
                name: String::from("potion"),
                count: 3,
                tint: None,
            },
        ],
        properties,
        parent: None,
        slots: (4, Some(-1)),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[test]
fn schema_decode_matches_direct_tree() {
    let entity = entity();
    let schema = create_schema::<Entity>();
    let bytes = write_binary(&entity).unwrap();

    let decoded = decode(&schema, &bytes).unwrap();
    let direct = write_object(&entity).unwrap();
    assert_eq!(decoded, direct);
    assert!(decoded.identical(&direct));

    assert_eq!(decoded.at("physics").value(), Value::Str(String::from("kinematic")));
    assert_eq!(decoded.at("items").at(1).at("tint").value(), Value::Null);
    assert_eq!(decoded.at("properties").at("mass").value(), Value::Float(2.5));
    assert_eq!(
        decoded.at("sprite").at("pixels").get::<Vec<u8>>().unwrap().len(),
        2 * 12
    );
}

#[test]
fn round_trips_for_other_values() {
    let mut entity = entity();
    entity.shape = Shape::Circle(Circle { radius: 3.0 });
    entity.parent = Some(String::from("world"));
    entity.items.clear();
    entity.properties.clear();
    entity.sprite.pixels.clear();
    entity.slots.1 = None;

    let schema = create_schema::<Entity>();
    let decoded = decode(&schema, &write_binary(&entity).unwrap()).unwrap();
    assert_eq!(decoded, write_object(&entity).unwrap());
}

#[test]
fn variant_decode_selects_the_written_arm() {
    let schema = create_schema::<Shape>();
    let rect = Shape::Rect(Rect {
        width: 1.0,
        height: 2.0,
    });

    let tree = decode(&schema, &write_binary(&rect).unwrap()).unwrap();
    assert_eq!(tree.at("type").value(), Value::Str(String::from("rect")));
    assert_eq!(tree.at("value").at("width").value(), Value::Float(1.0));
    assert!(!tree.at("value").at("radius").is_valid());
}

#[test]
fn repeated_variant_labels_are_rejected() {
    let mut schema = create_schema::<Shape>();
    for token in &mut schema.tokens {
        if let Token::VariantNext { label } = token {
            *label = String::from("rect");
        }
    }

    let rect = Shape::Rect(Rect::default());
    assert_eq!(
        decode(&schema, &write_binary(&rect).unwrap()).unwrap_err(),
        PackError::Load(LoadError::RepeatedVariantLabels)
    );
}

#[test]
fn unknown_variant_label_is_rejected() {
    let schema = Schema {
        tokens: vec![
            Token::VariantBegin {
                labels: vec![String::from("circle")],
            },
            Token::VariantNext {
                label: String::from("circle"),
            },
            Token::F64,
            Token::VariantEnd,
        ],
    };
    let rect = Shape::Rect(Rect::default());
    assert_eq!(
        decode(&schema, &write_binary(&rect).unwrap()).unwrap_err(),
        PackError::Load(LoadError::NoMatchingVariant)
    );
}

#[test]
fn schema_describes_itself() {
    let schema = create_schema::<Entity>();
    let schema_schema = create_schema::<Schema>();

    let decoded = decode(&schema_schema, &write_binary(&schema).unwrap()).unwrap();
    assert_eq!(decoded, write_object(&schema).unwrap());
    assert_eq!(
        decoded.at("tokens").at(0).at("type").value(),
        Value::Str(String::from("object_begin"))
    );
}

#[test]
fn encode_inverts_decode() {
    let entity = entity();
    let schema = create_schema::<Entity>();
    let bytes = write_binary(&entity).unwrap();

    let tree = decode(&schema, &bytes).unwrap();
    assert_eq!(encode(&schema, &tree).unwrap(), bytes);
}

#[test]
fn edited_tree_encodes_to_the_edited_value() {
    let schema = create_schema::<Entity>();
    let tree = write_object(&entity()).unwrap();

    tree.at("pose").at("x").set(10.0_f64).unwrap();
    tree.at("items").at(0).at("count").set(5_i64).unwrap();

    let bytes = encode(&schema, &tree).unwrap();
    let entity: Entity = dp_pack::read_binary(&bytes).unwrap();
    assert_eq!(entity.pose.x, 10.0);
    assert_eq!(entity.items[0].count, 5);
}

#[test]
fn diff_of_decoded_trees() {
    let schema = create_schema::<Entity>();
    let base = entity();
    let mut modified = base.clone();
    modified.name = String::from("enemy");
    modified.items.pop();

    let base_tree = decode(&schema, &write_binary(&base).unwrap()).unwrap();
    let modified_tree = decode(&schema, &write_binary(&modified).unwrap()).unwrap();

    let delta = dp_object::diff(&base_tree, &modified_tree).unwrap();
    assert_eq!(delta.at("name").value(), Value::Str(String::from("enemy")));
    assert_eq!(delta.at("items").at("1").value(), Value::Null);
    assert!(!delta.at("pose").is_valid());

    let merged = dp_object::merge(&base_tree, &delta).unwrap();
    assert_eq!(merged, modified_tree);
    assert_eq!(encode(&schema, &merged).unwrap(), write_binary(&modified).unwrap());
}

#[test]
fn empty_tree_does_not_encode() {
    let schema = create_schema::<Entity>();
    assert!(encode(&schema, &Object::default()).is_err());
}

#[test]
fn decoded_tree_prints_as_json() {
    let item = Item {
        name: String::from("sword"),
        count: 1,
        tint: Some([0.5, 0.25, 1.0]),
    };
    let tree = decode(&create_schema::<Item>(), &write_binary(&item).unwrap()).unwrap();
    assert_eq!(
        serde_json::to_string(&tree).unwrap(),
        r#"{"name":"sword","count":1,"tint":[0.5,0.25,1.0]}"#
    );
}

#[test]
fn json_text_encodes_through_schema() {
    let tree: Object = serde_json::from_str(r#"{"name":"lamp","count":2,"tint":null}"#).unwrap();
    let bytes = encode(&create_schema::<Item>(), &tree).unwrap();

    let item: Item = dp_pack::read_binary(&bytes).unwrap();
    assert_eq!(item.name, "lamp");
    assert_eq!(item.count, 2);
    assert_eq!(item.tint, None);
}
