//! Descriptor fixtures shared by the unit tests.
//!
//! Schemas are assembled from `prost-types` descriptor structs so the tests
//! need no `protoc` and no generated code.

use crate::catalog::SchemaCatalog;
use crate::decode::{decode, Format};
use prost_reflect::DynamicMessage;
use prost_types::descriptor_proto::ExtensionRange;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, FileDescriptorSet, MessageOptions, OneofDescriptorProto,
};

pub(crate) use prost_types::field_descriptor_proto::{Label, Type};

/// Convert a snake_case name to lowerCamelCase
fn to_lower_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = false;

    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

pub(crate) fn field(name: &str, number: i32, label: Label, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(label as i32),
        r#type: Some(ty as i32),
        json_name: Some(to_lower_camel_case(name)),
        ..Default::default()
    }
}

pub(crate) fn message_field(
    name: &str,
    number: i32,
    label: Label,
    type_name: &str,
) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..field(name, number, label, Type::Message)
    }
}

pub(crate) fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

fn file(name: &str, package: &str, syntax: &str) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some(package.to_string()),
        syntax: Some(syntax.to_string()),
        ..Default::default()
    }
}

/// A proto3 file declaring a single empty message
pub(crate) fn single_message_file(name: &str, package: &str, message_name: &str) -> FileDescriptorProto {
    FileDescriptorProto {
        message_type: vec![message(message_name, vec![])],
        ..file(name, package, "proto3")
    }
}

/// ```text
/// syntax = "proto3";
/// package shop;
///
/// enum Status { STATUS_UNKNOWN = 0; STATUS_OPEN = 1; }
///
/// message Item {
///   string name = 1;
///   int32 quantity = 2;
/// }
///
/// message Order {
///   string id = 1;
///   repeated Item items = 2;
///   map<string, int32> labels = 3;
///   Item primary = 4;
///   optional string note = 5;
///   Order parent = 6;
///   repeated string tags = 7;
///   Status status = 8;
/// }
/// ```
pub(crate) fn shop_file() -> FileDescriptorProto {
    let status = EnumDescriptorProto {
        name: Some("Status".to_string()),
        value: vec![
            EnumValueDescriptorProto {
                name: Some("STATUS_UNKNOWN".to_string()),
                number: Some(0),
                ..Default::default()
            },
            EnumValueDescriptorProto {
                name: Some("STATUS_OPEN".to_string()),
                number: Some(1),
                ..Default::default()
            },
        ],
        ..Default::default()
    };

    let item = message(
        "Item",
        vec![
            field("name", 1, Label::Optional, Type::String),
            field("quantity", 2, Label::Optional, Type::Int32),
        ],
    );

    let labels_entry = DescriptorProto {
        options: Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..message(
            "LabelsEntry",
            vec![
                field("key", 1, Label::Optional, Type::String),
                field("value", 2, Label::Optional, Type::Int32),
            ],
        )
    };

    let note = FieldDescriptorProto {
        oneof_index: Some(0),
        proto3_optional: Some(true),
        ..field("note", 5, Label::Optional, Type::String)
    };

    let status_field = FieldDescriptorProto {
        type_name: Some(".shop.Status".to_string()),
        ..field("status", 8, Label::Optional, Type::Enum)
    };

    let order = DescriptorProto {
        nested_type: vec![labels_entry],
        oneof_decl: vec![OneofDescriptorProto {
            name: Some("_note".to_string()),
            ..Default::default()
        }],
        ..message(
            "Order",
            vec![
                field("id", 1, Label::Optional, Type::String),
                message_field("items", 2, Label::Repeated, ".shop.Item"),
                message_field("labels", 3, Label::Repeated, ".shop.Order.LabelsEntry"),
                message_field("primary", 4, Label::Optional, ".shop.Item"),
                note,
                message_field("parent", 6, Label::Optional, ".shop.Order"),
                field("tags", 7, Label::Repeated, Type::String),
                status_field,
            ],
        )
    };

    FileDescriptorProto {
        enum_type: vec![status],
        message_type: vec![item, order],
        ..file("shop/orders.proto", "shop", "proto3")
    }
}

pub(crate) fn shop_set() -> FileDescriptorSet {
    FileDescriptorSet {
        file: vec![shop_file()],
    }
}

pub(crate) fn shop_catalog() -> SchemaCatalog {
    SchemaCatalog::from_file_descriptor_set(shop_set()).unwrap()
}

/// Decode a `shop.Order` from JSON
pub(crate) fn order(catalog: &SchemaCatalog, json: &str) -> DynamicMessage {
    decode("shop.Order", json.as_bytes(), Format::Text, catalog).unwrap()
}

/// ```text
/// syntax = "proto2";
/// package ext;
///
/// message Base {
///   optional string name = 1;
///   extensions 100 to 199;
/// }
///
/// extend Base { optional int32 tag = 100; }
/// ```
pub(crate) fn extension_catalog() -> SchemaCatalog {
    let base = DescriptorProto {
        extension_range: vec![ExtensionRange {
            start: Some(100),
            end: Some(200),
            options: None,
        }],
        ..message("Base", vec![field("name", 1, Label::Optional, Type::String)])
    };

    let tag = FieldDescriptorProto {
        extendee: Some(".ext.Base".to_string()),
        ..field("tag", 100, Label::Optional, Type::Int32)
    };

    let file = FileDescriptorProto {
        message_type: vec![base],
        extension: vec![tag],
        ..file("ext/base.proto", "ext", "proto2")
    };

    SchemaCatalog::from_file_descriptor_set(FileDescriptorSet { file: vec![file] }).unwrap()
}

/// `google.protobuf.Any` plus:
///
/// ```text
/// syntax = "proto3";
/// package wrap;
/// import "google/protobuf/any.proto";
///
/// message Envelope { google.protobuf.Any payload = 1; }
/// message Inner { string label = 1; }
/// ```
pub(crate) fn any_catalog() -> SchemaCatalog {
    let any = FileDescriptorProto {
        message_type: vec![message(
            "Any",
            vec![
                field("type_url", 1, Label::Optional, Type::String),
                field("value", 2, Label::Optional, Type::Bytes),
            ],
        )],
        ..file("google/protobuf/any.proto", "google.protobuf", "proto3")
    };

    let wrap = FileDescriptorProto {
        dependency: vec!["google/protobuf/any.proto".to_string()],
        message_type: vec![
            message(
                "Envelope",
                vec![message_field(
                    "payload",
                    1,
                    Label::Optional,
                    ".google.protobuf.Any",
                )],
            ),
            message("Inner", vec![field("label", 1, Label::Optional, Type::String)]),
        ],
        ..file("wrap/envelope.proto", "wrap", "proto3")
    };

    SchemaCatalog::from_file_descriptor_set(FileDescriptorSet {
        file: vec![any, wrap],
    })
    .unwrap()
}

#[test]
fn test_to_lower_camel_case() {
    assert_eq!(to_lower_camel_case("type_url"), "typeUrl");
    assert_eq!(to_lower_camel_case("name"), "name");
}
