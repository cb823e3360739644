use crate::extractor::Dto;
use log::debug;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// OpenAPI primitive type a source type string maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Boolean,
    Array,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Boolean => "boolean",
            SchemaType::Array => "array",
        }
    }
}

/// Ordered substring table checked against the lower-cased type string.
///
/// Dates are documented as strings. Custom names containing `dto`, `enum` or `method` have no
/// richer representation and are documented as strings too.
const TYPE_MAPPING: &[(&[&str], SchemaType)] = &[
    (&["string"], SchemaType::String),
    (&["number"], SchemaType::Number),
    (&["boolean"], SchemaType::Boolean),
    (&["date"], SchemaType::String),
    (&["[]", "array"], SchemaType::Array),
    (&["dto", "enum", "method"], SchemaType::String),
];

/// Map a source type string to an OpenAPI type. Total: anything unrecognized is a string.
pub fn map_type(type_name: &str) -> SchemaType {
    let lowered = type_name.to_lowercase();
    TYPE_MAPPING
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| lowered.contains(needle)))
        .map(|(_, schema_type)| *schema_type)
        .unwrap_or(SchemaType::String)
}

/// OpenAPI Schema definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// The type of the schema (string, number, object, array, ...)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Properties for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Property>>,
    /// Required field names for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Reference to another schema
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Schema {
    /// A schema with only a primitive type.
    pub fn primitive(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type.as_str().to_string()),
            ..Default::default()
        }
    }

    /// An untyped object with a description.
    pub fn object(description: &str) -> Self {
        Self {
            schema_type: Some("object".to_string()),
            description: Some(description.to_string()),
            ..Default::default()
        }
    }

    /// A `$ref` to a named component schema.
    pub fn reference(name: &str) -> Self {
        Self {
            reference: Some(format!("#/components/schemas/{}", name)),
            ..Default::default()
        }
    }
}

/// Property definition for object schemas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "type")]
    pub property_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// Component schema for a DTO: mapped property types plus the list of required names.
pub fn dto_schema(dto: &Dto) -> Schema {
    debug!("Generating schema for DTO: {}", dto.name);

    let mut properties = IndexMap::new();
    let mut required = Vec::new();

    for prop in &dto.properties {
        properties.insert(
            prop.name.clone(),
            Property {
                property_type: map_type(&prop.type_name).as_str().to_string(),
                description: format!("{} property", prop.name),
                required: prop.required.then_some(true),
            },
        );
        if prop.required {
            required.push(prop.name.clone());
        }
    }

    Schema {
        schema_type: Some("object".to_string()),
        description: None,
        properties: Some(properties),
        required: if required.is_empty() { None } else { Some(required) },
        reference: None,
    }
}

/// Component schemas for every DTO in the model, keyed by DTO name in model order.
pub fn dto_schemas(dtos: &IndexMap<String, Dto>) -> IndexMap<String, Schema> {
    dtos.iter()
        .map(|(name, dto)| (name.clone(), dto_schema(dto)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::DtoProperty;
    use pretty_assertions::assert_eq;

    fn prop(name: &str, type_name: &str, required: bool) -> DtoProperty {
        DtoProperty {
            name: name.to_string(),
            type_name: type_name.to_string(),
            required,
            optional: !required,
            source_annotation: "ApiProperty".to_string(),
        }
    }

    #[test]
    fn test_map_primitive_types() {
        assert_eq!(map_type("string"), SchemaType::String);
        assert_eq!(map_type("number"), SchemaType::Number);
        assert_eq!(map_type("Boolean"), SchemaType::Boolean);
        assert_eq!(map_type("Date"), SchemaType::String);
    }

    #[test]
    fn test_map_array_types() {
        assert_eq!(map_type("ItemDTO[]"), SchemaType::Array);
        assert_eq!(map_type("Array"), SchemaType::Array);
    }

    #[test]
    fn test_map_order_wins_over_array_suffix() {
        assert_eq!(map_type("string[]"), SchemaType::String);
        assert_eq!(map_type("number[]"), SchemaType::Number);
    }

    #[test]
    fn test_map_custom_and_unknown_types() {
        assert_eq!(map_type("PickupMethod"), SchemaType::String);
        assert_eq!(map_type("PackageDTO"), SchemaType::String);
        assert_eq!(map_type("StatusEnum"), SchemaType::String);
        assert_eq!(map_type("Whatever"), SchemaType::String);
        assert_eq!(map_type(""), SchemaType::String);
    }

    #[test]
    fn test_dto_schema() {
        let dto = Dto {
            name: "CreateUserDTO".to_string(),
            file: "src/create-user.dto.ts".to_string(),
            properties: vec![prop("name", "string", true), prop("age", "number", false)],
        };

        let schema = dto_schema(&dto);

        assert_eq!(schema.schema_type.as_deref(), Some("object"));
        assert_eq!(schema.required, Some(vec!["name".to_string()]));
        let properties = schema.properties.unwrap();
        assert_eq!(properties["name"].property_type, "string");
        assert_eq!(properties["name"].required, Some(true));
        assert_eq!(properties["name"].description, "name property");
        assert_eq!(properties["age"].property_type, "number");
        assert_eq!(properties["age"].required, None);
    }

    #[test]
    fn test_dto_schema_keeps_declaration_order() {
        let dto = Dto {
            name: "PickupDTO".to_string(),
            file: "src/pickup.dto.ts".to_string(),
            properties: vec![
                prop("zone", "string", true),
                prop("address", "string", true),
                prop("notes", "string", false),
            ],
        };

        let schema = dto_schema(&dto);

        let names: Vec<&str> = schema.properties.as_ref().unwrap().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zone", "address", "notes"]);
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.find("\"zone\"").unwrap() < json.find("\"address\"").unwrap());
        assert_eq!(schema.required, Some(vec!["zone".to_string(), "address".to_string()]));
    }

    #[test]
    fn test_dto_schema_without_required_properties() {
        let dto = Dto {
            name: "EmptyDTO".to_string(),
            file: "x.dto.ts".to_string(),
            properties: vec![prop("note", "string", false)],
        };

        let value = serde_json::to_value(dto_schema(&dto)).unwrap();

        assert!(value.get("required").is_none());
        assert_eq!(value["properties"]["note"]["type"], "string");
    }

    #[test]
    fn test_reference_schema_serialization() {
        let value = serde_json::to_value(Schema::reference("BookingPickupDTO")).unwrap();
        assert_eq!(value, serde_json::json!({"$ref": "#/components/schemas/BookingPickupDTO"}));
    }
}
