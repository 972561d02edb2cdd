pub mod boss;
pub mod roster;
pub mod unit;
pub mod validate;

pub use boss::{load_bosses, resolve_bosses, Boss, DEFAULT_BOSSES_PATH};
pub use roster::{Roster, Team, UnitMask, MAX_ROSTER_SIZE};
pub use unit::{
    load_unit_records, load_units, Element, Rank, Role, Synergy, Unit, UnitRecord,
    DEFAULT_UNITS_PATH,
};
