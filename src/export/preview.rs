//! GeoJSON preview of a query for map renderers.

use serde::Serialize;

use crate::models::{CanonicalSite, ProximityResult};
use crate::proximity::METERS_PER_MILE;

#[derive(Debug, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub collection_type: &'static str,
    pub features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub feature_type: &'static str,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

#[derive(Debug, Serialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub geo_type: &'static str,
    /// [lon, lat]
    pub coordinates: [f64; 2],
}

#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum FeatureProperties {
    /// The school, with the buffer circle to draw around it
    Reference {
        label: String,
        radius_miles: f64,
        buffer_radius_meters: f64,
    },
    /// A matched address
    Candidate {
        identifier: String,
        distance_miles: f64,
    },
}

fn point(site: &CanonicalSite, properties: FeatureProperties) -> Feature {
    Feature {
        feature_type: "Feature",
        geometry: Geometry {
            geo_type: "Point",
            coordinates: [site.lon(), site.lat()],
        },
        properties,
    }
}

/// Reference point first, then one feature per result in result order.
pub fn preview(
    reference: &CanonicalSite,
    radius_miles: f64,
    results: &[ProximityResult],
) -> FeatureCollection {
    let mut features = Vec::with_capacity(results.len() + 1);
    features.push(point(
        reference,
        FeatureProperties::Reference {
            label: reference.id_text().to_string(),
            radius_miles,
            buffer_radius_meters: radius_miles * METERS_PER_MILE,
        },
    ));
    features.extend(results.iter().map(|r| {
        point(
            &r.site,
            FeatureProperties::Candidate {
                identifier: r.site.id_text().to_string(),
                distance_miles: r.distance_miles,
            },
        )
    }));

    FeatureCollection {
        collection_type: "FeatureCollection",
        features,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preview_json() {
        let school = CanonicalSite::new("Oak", -87.6, 41.8).unwrap();
        let results = vec![ProximityResult {
            site: CanonicalSite::new("1 Main St", -87.61, 41.81).unwrap(),
            distance_miles: 0.8,
        }];

        let value = serde_json::to_value(preview(&school, 1.0, &results)).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"].as_array().unwrap().len(), 2);
        assert_eq!(
            value["features"][0]["properties"],
            json!({
                "role": "reference",
                "label": "Oak",
                "radius_miles": 1.0,
                "buffer_radius_meters": 1609.0
            })
        );
        assert_eq!(
            value["features"][1]["geometry"],
            json!({ "type": "Point", "coordinates": [-87.61, 41.81] })
        );
        assert_eq!(value["features"][1]["properties"]["role"], "candidate");
    }
}
