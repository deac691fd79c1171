// =============================================================================
// Fazenda API - Search Inputs
// =============================================================================
// Request bodies for the spatial searches and their validated forms.
// =============================================================================

use serde::Deserialize;

use crate::error::ApiError;

/// Largest accepted search radius, roughly half the Earth's circumference.
pub const MAX_RADIUS_KM: f64 = 20_000.0;

/// A WGS84 coordinate that passed range checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ApiError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ApiError::Validation(
                "latitude deve estar entre -90 e 90".into(),
            ));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ApiError::Validation(
                "longitude deve estar entre -180 e 180".into(),
            ));
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Search radius in kilometres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRadius(f64);

impl SearchRadius {
    pub fn from_km(km: f64) -> Result<Self, ApiError> {
        if !km.is_finite() || km <= 0.0 {
            return Err(ApiError::Validation("raio_km deve ser maior que zero".into()));
        }
        if km > MAX_RADIUS_KM {
            return Err(ApiError::Validation(format!(
                "raio_km muito grande (máximo: {MAX_RADIUS_KM} km)"
            )));
        }
        Ok(Self(km))
    }

    pub fn km(&self) -> f64 {
        self.0
    }

    /// PostGIS geography distances are expressed in metres.
    pub fn meters(&self) -> f64 {
        self.0 * 1000.0
    }
}

/// Body of `POST /fazendas/busca-ponto`.
#[derive(Debug, Deserialize)]
pub struct PointSearchRequest {
    pub latitude: f64,
    pub longitude: f64,
}

impl PointSearchRequest {
    pub fn validate(&self) -> Result<GeoPoint, ApiError> {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Body of `POST /fazendas/busca-raio`.
#[derive(Debug, Deserialize)]
pub struct RadiusSearchRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub raio_km: f64,
}

impl RadiusSearchRequest {
    pub fn validate(&self) -> Result<(GeoPoint, SearchRadius), ApiError> {
        let point = GeoPoint::new(self.latitude, self.longitude)?;
        let radius = SearchRadius::from_km(self.raio_km)?;
        Ok((point, radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_coordinate_bounds() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
        assert!(GeoPoint::new(-23.5505, -46.6333).is_ok());
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn radius_limits() {
        assert!(SearchRadius::from_km(0.0).is_err());
        assert!(SearchRadius::from_km(-1.0).is_err());
        assert!(SearchRadius::from_km(20_000.1).is_err());
        assert!(SearchRadius::from_km(MAX_RADIUS_KM).is_ok());
    }

    #[test]
    fn radius_converts_to_meters() {
        let radius = SearchRadius::from_km(2.5).unwrap();
        assert_eq!(radius.km(), 2.5);
        assert_eq!(radius.meters(), 2500.0);
    }

    #[test]
    fn radius_request_validates_both_parts() {
        let req = RadiusSearchRequest {
            latitude: -21.7,
            longitude: -51.07,
            raio_km: 0.0,
        };
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));

        let req = RadiusSearchRequest {
            latitude: -21.7,
            longitude: -51.07,
            raio_km: 50.0,
        };
        let (point, radius) = req.validate().unwrap();
        assert_eq!(point.latitude(), -21.7);
        assert_eq!(radius.meters(), 50_000.0);
    }
}
