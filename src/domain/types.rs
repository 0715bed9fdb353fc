//! Shared types for the cleaning selector: areas, methods, method sets

use serde::{Serialize, Serializer};
use smallvec::SmallVec;

/// Identifier of the whole-bus pseudo-area
pub const WHOLE_BUS_ID: &str = "whole-bus";

/// Display name of the whole-bus pseudo-area
pub const WHOLE_BUS_NAME: &str = "Whole Bus (All Areas)";

/// Cleanable zones of the bus interior, in display order: (id, name)
const AREAS: [(&str, &str); 28] = [
    ("windshield", "Windshield"),
    ("dashboard", "Dashboard & Drivers Seat"),
    ("front-mirror-left", "Front Mirror Left"),
    ("front-mirror-right", "Front Mirror Right"),
    ("steps", "Steps"),
    ("seats-row1-left", "Row 1 Left"),
    ("seats-row2-left", "Row 2 Left"),
    ("seats-row2-right", "Row 2 Right"),
    ("seats-row3-left", "Row 3 Left"),
    ("seats-row3-right", "Row 3 Right"),
    ("seats-row4-left", "Row 4 Left"),
    ("seats-row4-right", "Row 4 Right"),
    ("seats-row5-left", "Row 5 Left"),
    ("seats-row5-right", "Row 5 Right"),
    ("seats-row6-left", "Row 6 Left"),
    ("seats-row6-right", "Row 6 Right"),
    ("seats-row7-left", "Row 7 Left"),
    ("seats-row7-right", "Row 7 Right"),
    ("seats-row8-left", "Row 8 Left"),
    ("seats-row8-right", "Row 8 Right"),
    ("seats-row9-left", "Row 9 Left"),
    ("seats-row9-right", "Row 9 Right"),
    ("seats-row10-left", "Row 10 Left"),
    ("seats-row10-middle", "Row 10 Middle"),
    ("seats-row10-right", "Row 10 Right"),
    ("aisle", "Aisle"),
    ("windows-left", "Windows (Left)"),
    ("windows-right", "Windows (Right)"),
];

/// Number of concrete cleanable areas
pub const AREA_COUNT: usize = AREAS.len();

/// Newtype wrapper for a concrete area, indexing the fixed area catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct AreaId(u8);

impl AreaId {
    /// Look up an area by its identifier (e.g. "seats-row3-left")
    pub fn parse(id: &str) -> Option<Self> {
        AREAS.iter().position(|(area_id, _)| *area_id == id).map(|idx| Self(idx as u8))
    }

    /// Area at the given catalog position
    pub fn from_index(idx: usize) -> Option<Self> {
        (idx < AREA_COUNT).then_some(Self(idx as u8))
    }

    /// All concrete areas in display order
    pub fn all() -> impl Iterator<Item = AreaId> {
        (0..AREA_COUNT).map(|idx| Self(idx as u8))
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        AREAS[self.index()].0
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        AREAS[self.index()].1
    }
}

impl std::fmt::Display for AreaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AreaId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// What the method checklist currently edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    /// Broadcast to every concrete area
    WholeBus,
    Area(AreaId),
}

impl Focus {
    /// Parse an area identifier or the whole-bus pseudo-identifier
    pub fn parse(id: &str) -> Option<Self> {
        if id == WHOLE_BUS_ID {
            Some(Focus::WholeBus)
        } else {
            AreaId::parse(id).map(Focus::Area)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Focus::WholeBus => WHOLE_BUS_ID,
            Focus::Area(area) => area.as_str(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Focus::WholeBus => WHOLE_BUS_NAME,
            Focus::Area(area) => area.name(),
        }
    }
}

impl std::fmt::Display for Focus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Focus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Cleaning technique with a fixed time cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CleaningMethod {
    BasicWash,
    DeepClean,
    Polish,
    Sanitize,
    PressureWash,
    Detail,
}

impl CleaningMethod {
    /// All methods in checklist order
    pub const ALL: [CleaningMethod; 6] = [
        CleaningMethod::BasicWash,
        CleaningMethod::DeepClean,
        CleaningMethod::Polish,
        CleaningMethod::Sanitize,
        CleaningMethod::PressureWash,
        CleaningMethod::Detail,
    ];

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == id)
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            CleaningMethod::BasicWash => "basic-wash",
            CleaningMethod::DeepClean => "deep-clean",
            CleaningMethod::Polish => "polish",
            CleaningMethod::Sanitize => "sanitize",
            CleaningMethod::PressureWash => "pressure-wash",
            CleaningMethod::Detail => "detail",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CleaningMethod::BasicWash => "Basic Wash",
            CleaningMethod::DeepClean => "Deep Clean",
            CleaningMethod::Polish => "Polish & Wax",
            CleaningMethod::Sanitize => "Sanitize",
            CleaningMethod::PressureWash => "Pressure Wash",
            CleaningMethod::Detail => "Detail Clean",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CleaningMethod::BasicWash => "Standard soap and water cleaning",
            CleaningMethod::DeepClean => "Intensive cleaning with specialized products",
            CleaningMethod::Polish => "Shine and protect the surface",
            CleaningMethod::Sanitize => "Disinfect and eliminate germs",
            CleaningMethod::PressureWash => "High-pressure water cleaning",
            CleaningMethod::Detail => "Meticulous attention to every detail",
        }
    }

    /// Time cost in minutes
    #[inline]
    pub fn minutes(&self) -> u32 {
        match self {
            CleaningMethod::BasicWash => 1,
            CleaningMethod::DeepClean => 3,
            CleaningMethod::Polish => 10,
            CleaningMethod::Sanitize => 8,
            CleaningMethod::PressureWash => 2,
            CleaningMethod::Detail => 6,
        }
    }
}

impl std::fmt::Display for CleaningMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of cleaning methods, unique per method, kept in insertion order
///
/// Order has no meaning for equality: `{polish, sanitize} == {sanitize, polish}`.
#[derive(Debug, Clone, Default)]
pub struct MethodSet(SmallVec<[CleaningMethod; 6]>);

impl MethodSet {
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Insert a method; returns false if it was already present
    pub fn insert(&mut self, method: CleaningMethod) -> bool {
        if self.contains(method) {
            return false;
        }
        self.0.push(method);
        true
    }

    /// Remove a method; returns false if it was not present
    pub fn remove(&mut self, method: CleaningMethod) -> bool {
        match self.0.iter().position(|m| *m == method) {
            Some(idx) => {
                self.0.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Copy of this set with `method` added if absent, removed if present
    pub fn toggled(&self, method: CleaningMethod) -> Self {
        let mut next = self.clone();
        if !next.remove(method) {
            next.insert(method);
        }
        next
    }

    #[inline]
    pub fn contains(&self, method: CleaningMethod) -> bool {
        self.0.contains(&method)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = CleaningMethod> + '_ {
        self.0.iter().copied()
    }

    /// Sum of the methods' fixed durations
    pub fn total_minutes(&self) -> u32 {
        self.0.iter().map(|m| m.minutes()).sum()
    }
}

impl PartialEq for MethodSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|m| other.contains(m))
    }
}

impl Eq for MethodSet {}

impl FromIterator<CleaningMethod> for MethodSet {
    fn from_iter<I: IntoIterator<Item = CleaningMethod>>(iter: I) -> Self {
        let mut set = MethodSet::new();
        for method in iter {
            set.insert(method);
        }
        set
    }
}

impl<const N: usize> From<[CleaningMethod; N]> for MethodSet {
    fn from(methods: [CleaningMethod; N]) -> Self {
        methods.into_iter().collect()
    }
}

impl Serialize for MethodSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

/// Format seconds as `m:ss` for countdown display
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
