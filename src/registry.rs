//! Append-only registry of markers considered for pointer hit-testing

use std::sync::Arc;

use crate::marker::Marker;

/// Markers in publication order. There is no removal path.
#[derive(Debug, Default, Clone)]
pub struct HitTestRegistry {
    markers: Vec<Arc<Marker>>,
}

impl HitTestRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, marker: Arc<Marker>) {
        self.markers.push(marker);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Marker>> {
        self.markers.iter()
    }

    /// Cheap copy of the current sequence for a single hit-test pass
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<Marker>> {
        self.markers.clone()
    }

    /// City names in registry order
    #[must_use]
    pub fn cities(&self) -> Vec<String> {
        self.markers.iter().map(|m| m.city().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::MarkerSpec;
    use crate::projection::GeoCoordinate;
    use crate::scene::NodeHandle;
    use crate::weather::WeatherSample;

    fn marker(city: &str, node: usize) -> Arc<Marker> {
        Arc::new(Marker {
            spec: MarkerSpec::new(
                GeoCoordinate::new(0.0, 0.0),
                WeatherSample::new(city, 20, "haze"),
                2.05,
            ),
            node: NodeHandle(node),
        })
    }

    #[test]
    fn test_append_preserves_order() {
        let mut registry = HitTestRegistry::new();
        assert!(registry.is_empty());
        registry.append(marker("Sydney", 3));
        registry.append(marker("Pune", 4));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.cities(), vec!["Sydney", "Pune"]);
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_appends() {
        let mut registry = HitTestRegistry::new();
        registry.append(marker("Cairo", 3));
        let snapshot = registry.snapshot();
        registry.append(marker("Tokyo", 4));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 2);
        assert!(Arc::ptr_eq(&snapshot[0], registry.iter().next().unwrap()));
    }
}
