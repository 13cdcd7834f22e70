//! Unit application ordering
//!
//! Total, deterministic order over configuration units: ascending priority
//! rank, ties broken by registration sequence. The order exists because later
//! callbacks are allowed to observe and override state established by earlier
//! ones; it is independent of the grouping-unit dependency edges.

use crate::unit::ConfigUnit;

/// Sort units by ascending rank, stable on registration sequence
pub fn sort_units(mut units: Vec<(u64, ConfigUnit)>) -> Vec<ConfigUnit> {
    units.sort_by_key(|(seq, unit)| (unit.rank(), *seq));
    units.into_iter().map(|(_, unit)| unit).collect()
}
