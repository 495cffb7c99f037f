//! Table-level descriptors: config flags, properties, features and stats.
//!
//! Table ids are dense `0..N`; `ALL_TABLES` is a command-level sentinel
//! that never indexes the table array directly.

use serde::{Deserialize, Serialize};

pub type TableId = u8;

/// Sentinel meaning "every table" in commands that permit it (flow-mod
/// delete, table-mod, the three stats multiparts).
pub const ALL_TABLES: TableId = 0xFF;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfigFlags {
    pub vacancy_events: bool,
}

/// Free-slot thresholds and current occupancy for `VACANCY` event
/// generation (glossary: "Vacancy property").
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct VacancyProperty {
    pub vacancy_down: u8,
    pub vacancy_up: u8,
    pub vacancy: u8,
    /// Whether the down-threshold event has fired since the last rearm.
    pub down_set: bool,
}

impl VacancyProperty {
    /// `vacancy_down <= vacancy_up` is required by table-mod; violating it
    /// is a `TABLE_FEATURES_FAILED / BAD_ARGUMENT` error, not a panic.
    pub fn thresholds_valid(&self) -> bool {
        self.vacancy_down <= self.vacancy_up
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TableProperty {
    Vacancy(VacancyProperty),
    Opaque { property_type: u16, data: Vec<u8> },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableDesc {
    pub config: TableConfigFlags,
    pub properties: Vec<TableProperty>,
}

impl TableDesc {
    pub fn vacancy_mut(&mut self) -> Option<&mut VacancyProperty> {
        self.properties.iter_mut().find_map(|p| match p {
            TableProperty::Vacancy(v) => Some(v),
            _ => None,
        })
    }

    pub fn vacancy(&self) -> Option<&VacancyProperty> {
        self.properties.iter().find_map(|p| match p {
            TableProperty::Vacancy(v) => Some(v),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableFeatures {
    pub name: String,
    pub max_entries: u32,
    pub config: TableConfigFlags,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableStats {
    pub table_id: TableId,
    pub active_count: u32,
    pub lookup_count: u64,
    pub matched_count: u64,
}

/// `(max_entries - active_count) * 100 / max_entries`, clamped into
/// `0..=100`. Shared by table-mod's `down_set` initialization and the
/// table-desc reply's live vacancy patch.
pub fn vacancy_percent(max_entries: u32, active_count: u32) -> u8 {
    if max_entries == 0 {
        return 0;
    }
    let free = max_entries.saturating_sub(active_count);
    ((free as u64 * 100) / max_entries as u64).min(100) as u8
}
