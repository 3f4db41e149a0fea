//! Slot-interval gate for recurring actions.

use kestrel_types::BlockTimestamp;

/// True iff strictly more than `interval_slots` slots elapsed between
/// `last` and `current`. The comparison is strict: an action gated on 120
/// slots fires at a delta of 121, never at 120.
///
/// Pure; callers advance their stored `last` timestamp only when they act
/// on a `true` result.
pub fn interval_elapsed(current: BlockTimestamp, last: BlockTimestamp, interval_slots: u32) -> bool {
    current.slot().wrapping_sub(last.slot()) > interval_slots
}
