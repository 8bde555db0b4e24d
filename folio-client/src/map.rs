#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub heading: f64,
    pub pitch: f64,
    pub description: &'static str,
}

pub const LOCATIONS: &[Location] = &[
    Location {
        name: "Golden Gate Bridge",
        lat: 37.807_8,
        lng: -122.475_0,
        heading: 34.0,
        pitch: 10.0,
        description: "Where the whole trip started, on a foggy morning.",
    },
    Location {
        name: "Griffith Observatory",
        lat: 34.118_4,
        lng: -118.300_4,
        heading: 265.0,
        pitch: 5.0,
        description: "Best view of the city lights after a long hike.",
    },
    Location {
        name: "Space Needle",
        lat: 47.620_5,
        lng: -122.349_3,
        heading: 120.0,
        pitch: 25.0,
        description: "My first internship was a few blocks from here.",
    },
    Location {
        name: "Pike Place Market",
        lat: 47.609_7,
        lng: -122.342_2,
        heading: 300.0,
        pitch: 0.0,
        description: "Fish throwing, flowers, and the original coffee shop.",
    },
];

/// Camera position of the street-view panorama
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Panorama {
    pub lat: f64,
    pub lng: f64,
    pub heading: f64,
    pub pitch: f64,
}

impl Panorama {
    pub fn embed_url(&self) -> String {
        format!(
            "https://maps.google.com/maps?layer=c&cbll={},{}&cbp=11,{},0,0,{}&output=svembed",
            self.lat, self.lng, self.heading, self.pitch,
        )
    }
}

impl From<&Location> for Panorama {
    fn from(l: &Location) -> Panorama {
        Panorama {
            lat: l.lat,
            lng: l.lng,
            heading: l.heading,
            pitch: l.pitch,
        }
    }
}

/// Markers over a fixed table of locations, one of which has its panorama
/// shown
#[derive(Clone, Debug, PartialEq)]
pub struct MapView {
    locations: &'static [Location],
    active: usize,
    hovered: Option<usize>,
}

impl Default for MapView {
    fn default() -> MapView {
        MapView::new(LOCATIONS)
    }
}

impl MapView {
    pub fn new(locations: &'static [Location]) -> MapView {
        MapView {
            locations,
            active: 0,
            hovered: None,
        }
    }

    pub fn locations(&self) -> &'static [Location] {
        self.locations
    }

    pub fn active(&self) -> Option<usize> {
        (self.active < self.locations.len()).then_some(self.active)
    }

    pub fn panorama(&self) -> Option<Panorama> {
        self.locations.get(self.active).map(Panorama::from)
    }

    /// Marker click: point the panorama at location `idx`
    pub fn activate(&mut self, idx: usize) -> Option<Panorama> {
        let pano = self.locations.get(idx).map(Panorama::from)?;
        self.active = idx;
        Some(pano)
    }

    /// Marker hover: open its info window and start its highlight
    pub fn hover(&mut self, idx: usize) {
        if idx < self.locations.len() {
            self.hovered = Some(idx);
        }
    }

    pub fn unhover(&mut self) {
        self.hovered = None;
    }

    pub fn info_window(&self) -> Option<&'static Location> {
        self.hovered.and_then(|i| self.locations.get(i))
    }

    pub fn is_highlighted(&self, idx: usize) -> bool {
        self.hovered == Some(idx)
    }
}
