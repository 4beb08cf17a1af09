//! # Change filter
//!
//! Each input channel remembers the value it last emitted and only lets through values that differ
//! enough from it. A channel's memory is only updated by [`commit`](VectorChannel::commit), which
//! the pipeline calls once a change has actually been passed on, so a change that was deferred is
//! still reported on the next report.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::BTreeSet;

use super::vector::DirectionalVector;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Trigger changes of this size or smaller are dropped.
pub const TRIGGER_TOLERANCE: u16 = 2;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A directional channel (stick or dpad).
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorChannel {
    last: DirectionalVector,
}

/// A scalar trigger channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriggerChannel {
    last: u16,
}

/// Press edge detector for the button set.
#[derive(Debug, Clone, Default)]
pub struct ButtonEdges {
    held: BTreeSet<u16>,
}

/// Change filters for every channel of a controller.
#[derive(Debug, Clone, Default)]
pub struct ChangeFilter {
    pub left_stick: VectorChannel,
    pub right_stick: VectorChannel,
    pub dpad: VectorChannel,
    pub left_trigger: TriggerChannel,
    pub right_trigger: TriggerChannel,
    pub buttons: ButtonEdges,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl VectorChannel {
    /// True if `new` differs from the last emitted vector.
    pub fn is_changed(&self, new: &DirectionalVector) -> bool {
        !new.is_unchanged_from(&self.last)
    }

    /// Record `new` as emitted.
    pub fn commit(&mut self, new: DirectionalVector) {
        self.last = new;
    }

    pub fn last(&self) -> DirectionalVector {
        self.last
    }
}

impl TriggerChannel {
    /// True if `new` is more than [`TRIGGER_TOLERANCE`] away from the last emitted value.
    pub fn is_changed(&self, new: u16) -> bool {
        new.abs_diff(self.last) > TRIGGER_TOLERANCE
    }

    pub fn commit(&mut self, new: u16) {
        self.last = new;
    }

    pub fn last(&self) -> u16 {
        self.last
    }
}

impl ButtonEdges {
    /// Buttons active in `active` which were not held in the last committed set, in ascending ID
    /// order.
    pub fn pressed(&self, active: &[u16]) -> Vec<u16> {
        let current: BTreeSet<u16> = active.iter().copied().collect();

        current.difference(&self.held).copied().collect()
    }

    /// True if the active set differs from the held set at all, including releases.
    pub fn is_changed(&self, active: &[u16]) -> bool {
        let current: BTreeSet<u16> = active.iter().copied().collect();

        current != self.held
    }

    /// Record `active` as the held set.
    pub fn commit(&mut self, active: &[u16]) {
        self.held = active.iter().copied().collect();
    }
}

#[cfg(test)]
mod test {
    use super::super::vector::DirectionOctant;
    use super::*;

    #[test]
    fn test_vector_tolerance() {
        let mut ch = VectorChannel::default();

        let first = DirectionalVector::new(DirectionOctant::Up, 2000);
        assert!(ch.is_changed(&first));
        ch.commit(first);

        // Same direction, delta of 4 is dropped, delta of 5 is not
        assert!(!ch.is_changed(&DirectionalVector::new(DirectionOctant::Up, 2004)));
        assert!(ch.is_changed(&DirectionalVector::new(DirectionOctant::Up, 2005)));
        assert!(ch.is_changed(&DirectionalVector::new(DirectionOctant::UpRight, 2000)));
    }

    #[test]
    fn test_vector_only_updates_on_commit() {
        let mut ch = VectorChannel::default();
        ch.commit(DirectionalVector::new(DirectionOctant::Up, 2000));

        // Small steps which are never committed can't creep past the tolerance unnoticed
        let drifted = DirectionalVector::new(DirectionOctant::Up, 2003);
        assert!(!ch.is_changed(&drifted));
        let drifted = DirectionalVector::new(DirectionOctant::Up, 2006);
        assert!(ch.is_changed(&drifted));
        assert_eq!(ch.last().magnitude, 2000);
    }

    #[test]
    fn test_trigger_tolerance() {
        let mut ch = TriggerChannel::default();

        assert!(!ch.is_changed(0));
        assert!(!ch.is_changed(2));
        assert!(ch.is_changed(3));

        ch.commit(5000);
        assert!(!ch.is_changed(4998));
        assert!(ch.is_changed(4997));
        assert!(ch.is_changed(0));
    }

    #[test]
    fn test_button_edges() {
        let mut b = ButtonEdges::default();

        assert_eq!(b.pressed(&[12, 5]), vec![5, 12]);
        b.commit(&[12, 5]);

        // Held buttons aren't pressed again
        assert_eq!(b.pressed(&[5, 12]), Vec::<u16>::new());
        assert!(!b.is_changed(&[5, 12]));

        // Release of 12 is a change with no press
        assert!(b.is_changed(&[5]));
        assert!(b.pressed(&[5]).is_empty());
        b.commit(&[5]);

        assert_eq!(b.pressed(&[5, 12]), vec![12]);
    }
}
