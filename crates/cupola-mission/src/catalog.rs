//! Mission catalog: the observation targets a player can pick from.
//!
//! The catalog is loaded once at startup, either from a RON file or from
//! the built-in list, and is read-only afterwards.

use std::collections::HashMap;
use std::path::Path;

use cupola_math::GeoPoint;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::CatalogError;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// One observation mission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MissionDef {
    /// Stable identifier used by `select_mission`.
    pub id: String,
    pub title: String,
    /// Human-readable place name.
    pub location: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    pub year: i32,
    pub description: String,
    /// Reference to the archive photo shown after a successful capture.
    pub image_ref: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Text read out when the mission is briefed.
    pub briefing: String,
}

impl MissionDef {
    pub fn geo(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Ordered missions with lookup by id.
#[derive(Clone, Debug, Default)]
pub struct MissionCatalog {
    missions: Vec<MissionDef>,
    id_index: HashMap<String, usize>,
}

impl MissionCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mission. Returns its index.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is already taken or the coordinates are
    /// out of range.
    pub fn register(&mut self, mission: MissionDef) -> Result<usize, CatalogError> {
        if self.id_index.contains_key(&mission.id) {
            return Err(CatalogError::DuplicateId(mission.id));
        }
        if !mission.geo().is_valid() {
            return Err(CatalogError::InvalidCoordinates {
                id: mission.id,
                lat: mission.lat,
                lon: mission.lon,
            });
        }
        let idx = self.missions.len();
        self.id_index.insert(mission.id.clone(), idx);
        self.missions.push(mission);
        Ok(idx)
    }

    /// Build a catalog from a list, rejecting empty lists.
    ///
    /// # Errors
    ///
    /// Returns the first registration error, or [`CatalogError::Empty`].
    pub fn from_missions(missions: Vec<MissionDef>) -> Result<Self, CatalogError> {
        if missions.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut catalog = Self::new();
        for mission in missions {
            catalog.register(mission)?;
        }
        Ok(catalog)
    }

    /// Parse a RON list of missions.
    ///
    /// # Errors
    ///
    /// Returns a parse error or any validation error from
    /// [`from_missions`](Self::from_missions).
    pub fn from_ron(s: &str) -> Result<Self, CatalogError> {
        let missions: Vec<MissionDef> = ron::from_str(s)?;
        Self::from_missions(missions)
    }

    /// Load a RON catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or fails validation.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let catalog = Self::from_ron(&contents)?;
        info!(path = %path.display(), missions = catalog.len(), "loaded mission catalog");
        Ok(catalog)
    }

    /// Load `path` if given, falling back to the built-in catalog when it is
    /// absent or broken.
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };
        match Self::load(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(error = %e, "falling back to built-in mission catalog");
                Self::builtin()
            }
        }
    }

    /// Look up a mission by id.
    pub fn get(&self, id: &str) -> Option<&MissionDef> {
        self.id_index.get(id).map(|&idx| &self.missions[idx])
    }

    /// Number of missions.
    pub fn len(&self) -> usize {
        self.missions.len()
    }

    /// Returns true if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    /// Iterate in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &MissionDef> {
        self.missions.iter()
    }

    /// Serialize to a RON list.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(&self.missions, ron::ser::PrettyConfig::default())
    }

    /// The missions shipped with the simulation.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for mission in builtin_missions() {
            // Built-in ids and coordinates are fixed and valid.
            if let Err(e) = catalog.register(mission) {
                warn!(error = %e, "skipping built-in mission");
            }
        }
        catalog
    }
}

#[allow(clippy::too_many_arguments)]
fn mission(
    id: &str,
    title: &str,
    location: &str,
    (lat, lon): (f64, f64),
    year: i32,
    description: &str,
    highlights: &[&str],
    difficulty: Difficulty,
    briefing: &str,
) -> MissionDef {
    MissionDef {
        id: id.to_string(),
        title: title.to_string(),
        location: location.to_string(),
        lat,
        lon,
        year,
        description: description.to_string(),
        image_ref: format!("images/{id}.jpg"),
        highlights: highlights.iter().map(|h| (*h).to_string()).collect(),
        difficulty,
        briefing: briefing.to_string(),
    }
}

fn builtin_missions() -> Vec<MissionDef> {
    vec![
        mission(
            "new-york-night",
            "City Lights of New York",
            "New York City, USA",
            (40.7, -74.0),
            2019,
            "The street grid of Manhattan glowing at night.",
            &["Manhattan grid", "Hudson River", "Long Island"],
            Difficulty::Easy,
            "Find the brightest cluster of lights on the east coast of North America and take a photo.",
        ),
        mission(
            "wildfire-california-2020",
            "California Wildfires 2020",
            "California, USA",
            (37.7749, -122.4194),
            2020,
            "Massive wildfire outbreak across California, affecting millions of acres.",
            &["Smoke plumes", "Fire fronts", "Bay Area"],
            Difficulty::Medium,
            "Smoke is drifting over the Pacific coast. Locate the fire fronts near San Francisco.",
        ),
        mission(
            "hurricane-ida-2021",
            "Hurricane Ida 2021",
            "Louisiana, USA",
            (29.9511, -90.0715),
            2021,
            "Category 4 hurricane making landfall in Louisiana.",
            &["Eye of the storm", "Gulf of Mexico", "New Orleans"],
            Difficulty::Medium,
            "A major hurricane is approaching the Gulf coast. Capture the eye before landfall.",
        ),
        mission(
            "flood-pakistan-2022",
            "Pakistan Floods 2022",
            "Indus Valley, Pakistan",
            (30.3753, 69.3451),
            2022,
            "Catastrophic flooding affecting one third of Pakistan.",
            &["Indus River", "Flooded plains"],
            Difficulty::Hard,
            "Relief teams need imagery of the flooded Indus valley.",
        ),
        mission(
            "earthquake-turkey-2023",
            "Turkey-Syria Earthquake 2023",
            "Kahramanmaras, Turkey",
            (37.0662, 37.3833),
            2023,
            "Magnitude 7.8 earthquake affecting Turkey and Syria.",
            &["Fault line", "Damaged cities"],
            Difficulty::Hard,
            "Rescue coordinators need a damage overview of southern Turkey.",
        ),
        mission(
            "volcano-tonga-2022",
            "Hunga Tonga Eruption 2022",
            "Tonga, South Pacific",
            (-20.536, -175.382),
            2022,
            "Massive underwater volcanic eruption in Tonga.",
            &["Ash cloud", "Shock wave"],
            Difficulty::Hard,
            "An eruption cloud is spreading over the South Pacific. Photograph the ash plume.",
        ),
    ]
}
