//! Reading and writing the GeoJSON `crs` member.
//!
//! RFC 7946 dropped the member and fixed coordinates to WGS 84, but layers
//! exported from desktop GIS still carry it in the 2008 form:
//!
//! ```json
//! { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::26918" } }
//! { "type": "EPSG", "properties": { "code": 26918 } }
//! ```

use geojson::{FeatureCollection, JsonObject, JsonValue};
use serde_json::json;
use superfund_core::{Crs, ProjectionError};

const CRS_MEMBER: &str = "crs";

/// Reference system declared by `collection`.
///
/// A collection without the member is WGS 84. An explicit `null` declares
/// no reference system and yields `None`.
pub(crate) fn declared_crs(collection: &FeatureCollection) -> Result<Option<Crs>, ProjectionError> {
    let member = collection
        .foreign_members
        .as_ref()
        .and_then(|members| members.get(CRS_MEMBER));
    match member {
        None => Ok(Some(Crs::Wgs84)),
        Some(JsonValue::Null) => Ok(None),
        Some(value) => parse_member(value).map(Some),
    }
}

fn parse_member(value: &JsonValue) -> Result<Crs, ProjectionError> {
    let unparseable = || ProjectionError::Unparseable {
        value: value.to_string(),
    };
    let properties = value.get("properties").ok_or_else(unparseable)?;
    match value.get("type").and_then(JsonValue::as_str) {
        Some(kind) if kind.eq_ignore_ascii_case("name") => properties
            .get("name")
            .and_then(JsonValue::as_str)
            .ok_or_else(unparseable)?
            .parse(),
        Some(kind) if kind.eq_ignore_ascii_case("epsg") => {
            let code = properties
                .get("code")
                .and_then(JsonValue::as_u64)
                .and_then(|code| u32::try_from(code).ok())
                .ok_or_else(unparseable)?;
            Crs::from_epsg(code)
        }
        _ => Err(unparseable()),
    }
}

/// Foreign members declaring `crs`, for writing alongside a collection.
pub(crate) fn crs_member(crs: Crs) -> JsonObject {
    let mut members = JsonObject::new();
    members.insert(
        CRS_MEMBER.to_owned(),
        json!({ "type": "name", "properties": { "name": crs.urn() } }),
    );
    members
}
