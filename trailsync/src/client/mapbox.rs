//! Mapbox Static Images renderer.
//!
//! The rendering service is stateless: a map is "rendered" by building a
//! Static Images API URL that overlays a GeoJSON feature collection on a
//! styled base map, framed to a bounding box. The content repository then
//! imports the image from that URL.
//!
//! # URL Pattern
//!
//! `https://api.mapbox.com/styles/v1/{style}/static/geojson({geojson})/[minLon,minLat,maxLon,maxLat]/{w}x{h}?padding={p}&access_token={token}`

use reqwest::Url;
use tracing::{debug, warn};

use super::types::ClientError;
use super::MapRenderer;
use crate::feature::FeatureCollection;
use crate::geo::BoundingBox;

/// Base URL for the Static Images API.
const MAPBOX_STATIC_BASE_URL: &str = "https://api.mapbox.com/styles/v1";

/// Default map style (`{owner}/{style_id}`).
pub const DEFAULT_STYLE: &str = "mapbox/outdoors-v11";

/// Default image width in pixels.
pub const DEFAULT_WIDTH: u32 = 1280;

/// Default image height in pixels.
pub const DEFAULT_HEIGHT: u32 = 800;

/// Default padding around the framed box in pixels.
pub const DEFAULT_PADDING: u32 = 50;

/// Longest request URL the Static Images API accepts.
pub const MAX_URL_LENGTH: usize = 8192;

/// Largest width or height the API renders.
const MAX_DIMENSION: u32 = 1280;

/// Renderer producing Mapbox Static Images URLs.
///
/// # Example
///
/// ```ignore
/// use trailsync::client::MapboxRenderer;
///
/// let renderer = MapboxRenderer::new("pk.token").with_size(1024, 768);
/// ```
#[derive(Debug, Clone)]
pub struct MapboxRenderer {
    access_token: String,
    style: String,
    width: u32,
    height: u32,
    padding: u32,
}

impl MapboxRenderer {
    /// Creates a renderer with the default style and image size.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            style: DEFAULT_STYLE.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            padding: DEFAULT_PADDING,
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Sets the image size, clamped to what the API renders.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.clamp(1, MAX_DIMENSION);
        self.height = height.clamp(1, MAX_DIMENSION);
        self
    }

    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Builds the static image URL for `features` framed to `bounds`.
    pub fn build_url(
        &self,
        bounds: &BoundingBox,
        features: &FeatureCollection,
    ) -> Result<String, ClientError> {
        let overlay = serde_json::to_string(features)
            .map_err(|e| ClientError::InvalidResponse(format!("GeoJSON overlay: {}", e)))?;
        let frame = format!(
            "[{},{},{},{}]",
            bounds.min.longitude, bounds.min.latitude, bounds.max.longitude, bounds.max.latitude
        );
        let size = format!("{}x{}", self.width, self.height);

        let mut url = Url::parse(MAPBOX_STATIC_BASE_URL)
            .map_err(|e| ClientError::Config(format!("Mapbox base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Config("Mapbox base URL cannot have a path".to_string()))?
            .extend(self.style.split('/').filter(|s| !s.is_empty()))
            .push("static")
            .push(&format!("geojson({})", overlay))
            .push(&frame)
            .push(&size);
        url.query_pairs_mut()
            .append_pair("padding", &self.padding.to_string())
            .append_pair("access_token", &self.access_token);

        Ok(url.into())
    }
}

impl MapRenderer for MapboxRenderer {
    async fn render_map(
        &self,
        bounds: &BoundingBox,
        features: &FeatureCollection,
    ) -> Result<String, ClientError> {
        let url = self.build_url(bounds, features)?;
        debug!(
            features = features.len(),
            url_length = url.len(),
            "Built static map URL"
        );
        if url.len() > MAX_URL_LENGTH {
            warn!(
                url_length = url.len(),
                limit = MAX_URL_LENGTH,
                "Static map URL exceeds the API limit, rendering will likely fail"
            );
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::boundary_feature;
    use crate::geo::Coordinate;

    fn bounds() -> BoundingBox {
        BoundingBox {
            min: Coordinate {
                latitude: 39.1,
                longitude: -120.2,
            },
            max: Coordinate {
                latitude: 39.3,
                longitude: -120.0,
            },
        }
    }

    #[test]
    fn test_url_layout() {
        let renderer = MapboxRenderer::new("tok");
        let features = FeatureCollection::new(vec![boundary_feature(&bounds())]);

        let url = renderer.build_url(&bounds(), &features).unwrap();

        assert!(url.starts_with(
            "https://api.mapbox.com/styles/v1/mapbox/outdoors-v11/static/geojson("
        ));
        assert!(url.contains(")/[-120.2,39.1,-120,39.3]/1280x800?"));
        assert!(url.ends_with("padding=50&access_token=tok"));
    }

    #[test]
    fn test_overlay_is_percent_encoded() {
        let renderer = MapboxRenderer::new("tok");
        let features = FeatureCollection::new(vec![boundary_feature(&bounds())]);

        let url = renderer.build_url(&bounds(), &features).unwrap();

        assert!(url.contains("%22FeatureCollection%22"));
        assert!(url.contains("%23ff3300"));
        assert!(!url.contains('"'));
        assert!(!url.contains('#'));
    }

    #[test]
    fn test_custom_style_and_size() {
        let renderer = MapboxRenderer::new("tok")
            .with_style("acme/trails")
            .with_size(4000, 600)
            .with_padding(10);

        let url = renderer
            .build_url(&bounds(), &FeatureCollection::default())
            .unwrap();

        assert!(url.starts_with("https://api.mapbox.com/styles/v1/acme/trails/static/"));
        assert!(url.contains("/1280x600?padding=10&"));
    }

    #[tokio::test]
    async fn test_render_map_returns_long_urls() {
        let renderer = MapboxRenderer::new("tok");
        let features = FeatureCollection::new(
            (0..200).map(|_| boundary_feature(&bounds())).collect(),
        );

        let url = renderer.render_map(&bounds(), &features).await.unwrap();
        assert!(url.len() > MAX_URL_LENGTH);
    }
}
