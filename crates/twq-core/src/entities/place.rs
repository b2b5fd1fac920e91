//! Place entity.

use serde::{Deserialize, Serialize};

use crate::error::QueryResult;
use crate::parameter::QueryParameter;
use crate::schema::{Entity, EntityType, Expansion, field_catalogue, relation_catalogue};

field_catalogue! {
    /// Optional fields of [`Place`], requested through `place.fields`.
    pub enum PlaceField in Place {
        ContainedWithin => "contained_within",
        Country => "country",
        CountryCode => "country_code",
        Geo => "geo",
        Name => "name",
        PlaceType => "place_type",
    }
}

relation_catalogue! {
    pub enum PlaceRelation in Place {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceExpansion {}

impl Expansion for PlaceExpansion {
    type Relation = PlaceRelation;

    fn relation(&self) -> PlaceRelation {
        match *self {}
    }

    fn nested_parameter(&self) -> Option<QueryParameter> {
        match *self {}
    }

    fn bare(relation: PlaceRelation) -> Self {
        match relation {}
    }

    fn from_parts<S: AsRef<str>>(relation: PlaceRelation, _nested: &[S]) -> QueryResult<Self> {
        match relation {}
    }
}

/// Place object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Place ID
    pub id: String,

    /// Full name (e.g., "San Francisco, CA")
    pub full_name: String,

    /// IDs of places containing this one
    #[serde(default)]
    pub contained_within: Option<Vec<String>>,

    #[serde(default)]
    pub country: Option<String>,

    /// ISO alpha-2 country code
    #[serde(default)]
    pub country_code: Option<String>,

    /// Geo bounding box
    #[serde(default)]
    pub geo: Option<PlaceGeo>,

    /// Short name
    #[serde(default)]
    pub name: Option<String>,

    /// e.g. "city", "admin", "poi"
    #[serde(default)]
    pub place_type: Option<String>,
}

impl Entity for Place {
    const TYPE: EntityType = EntityType::Place;
    type Field = PlaceField;
    type Expansion = PlaceExpansion;
}

/// `GeoJSON` feature describing a place's extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceGeo {
    /// Geometry type, usually "Feature"
    #[serde(rename = "type")]
    pub geo_type: String,

    /// Bounding box `[west, south, east, north]`
    pub bbox: Vec<f64>,

    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}
