//! Colour mappings between neighbouring quads

use core_lib::spectrum::*;
use shapes::{Corner, ElemIndex, Quad};

/// Position of a neighbour relative to a quad in a face grid. Rows grow
/// upwards and columns grow rightwards in the face's visual frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    UpperRight,
    Upper,
    UpperLeft,
    Right,
    Itself,
    Left,
    BottomRight,
    Bottom,
    BottomLeft,
}

impl Slot {
    /// The eight neighbour slots.
    pub const NEIGHBOURS: [Slot; 8] = [
        Slot::UpperRight,
        Slot::Upper,
        Slot::UpperLeft,
        Slot::Right,
        Slot::Left,
        Slot::BottomRight,
        Slot::Bottom,
        Slot::BottomLeft,
    ];

    /// Returns the (column, row) offset of the slot.
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Slot::UpperRight => (1, 1),
            Slot::Upper => (0, 1),
            Slot::UpperLeft => (-1, 1),
            Slot::Right => (1, 0),
            Slot::Itself => (0, 0),
            Slot::Left => (-1, 0),
            Slot::BottomRight => (1, -1),
            Slot::Bottom => (0, -1),
            Slot::BottomLeft => (-1, -1),
        }
    }

    /// Returns the corners of the quad in this slot that coincide with
    /// corners of the quad at the centre of the neighbourhood.
    pub fn target_corners(&self) -> impl Iterator<Item = Corner> {
        let (dc, dr) = self.offset();
        Corner::ALL.into_iter().filter(move |corner| {
            let (cc, cr) = corner.grid_offset();
            (0..=1).contains(&(dc + cc)) && (0..=1).contains(&(dr + cr))
        })
    }
}

/// A quad reached from a mapping and the slot it occupies.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MappedQuad {
    /// Index of the quad.
    pub quad: ElemIndex,

    /// Slot of the quad relative to the mapping's own quad.
    pub slot: Slot,
}

impl MappedQuad {
    /// Deposit a colour on the corners of the quad shared with the centre.
    ///
    /// * `quads` - All quads.
    /// * `c`     - The colour.
    pub fn add_color(&self, quads: &mut [Quad], c: RGBSpectrum) {
        let quad = &mut quads[self.quad];
        for corner in self.slot.target_corners() {
            quad.add_color(corner, c, 1.0);
        }
    }
}

/// The 3x3 neighbourhood of a quad within its face.
#[derive(Clone, Debug, PartialEq)]
pub struct Mapping {
    /// The quad itself.
    k: MappedQuad,

    /// Neighbours in `Slot::NEIGHBOURS` order; `None` at face borders.
    neighbours: [Option<MappedQuad>; 8],
}

impl Mapping {
    /// Create a mapping with no neighbours.
    ///
    /// * `k` - Index of the quad at the centre.
    pub fn new(k: ElemIndex) -> Self {
        Self {
            k: MappedQuad {
                quad: k,
                slot: Slot::Itself,
            },
            neighbours: [None; 8],
        }
    }

    /// Returns the index of the quad at the centre.
    pub fn k(&self) -> ElemIndex {
        self.k.quad
    }

    /// Set the neighbour occupying a slot.
    ///
    /// * `slot` - A neighbour slot.
    /// * `quad` - Index of the neighbour.
    pub fn set(&mut self, slot: Slot, quad: ElemIndex) {
        match Self::neighbour_index(slot) {
            Some(i) => self.neighbours[i] = Some(MappedQuad { quad, slot }),
            None => warn!("Mapping::set(): cannot replace centre quad {}", self.k.quad),
        }
    }

    /// Returns the quad occupying a slot.
    ///
    /// * `slot` - The slot.
    pub fn get(&self, slot: Slot) -> Option<&MappedQuad> {
        match Self::neighbour_index(slot) {
            Some(i) => self.neighbours[i].as_ref(),
            None => Some(&self.k),
        }
    }

    /// Returns the centre quad followed by every populated neighbour.
    pub fn iter(&self) -> impl Iterator<Item = &MappedQuad> {
        std::iter::once(&self.k).chain(self.neighbours.iter().flatten())
    }

    /// Deposit the centre quad's radiosity on all corners it touches in the
    /// neighbourhood.
    ///
    /// * `quads` - All quads.
    /// * `c`     - Radiosity of the centre quad.
    pub fn add_color(&self, quads: &mut [Quad], c: RGBSpectrum) {
        for mq in self.iter() {
            mq.add_color(quads, c);
        }
    }

    fn neighbour_index(slot: Slot) -> Option<usize> {
        Slot::NEIGHBOURS.iter().position(|s| *s == slot)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
