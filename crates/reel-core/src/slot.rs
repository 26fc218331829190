#![forbid(unsafe_code)]

//! Slot assignment and layout requests.
//!
//! A card's slot is a pure function of its circular offset from the centered
//! index. The renderer only ever sees [`Layout`] snapshots; it owns every DOM
//! or GPU mutation.

/// Symbolic position of a card relative to the centered card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Center,
    Right,
    FarRight,
    Left,
    FarLeft,
}

impl Slot {
    /// Slot for `card` when `current` is centered in a carousel of `count` cards.
    ///
    /// Offsets are checked in order `0, 1, count - 1, 2`; everything else is
    /// `FarLeft`. With two cards the neighbour is therefore `Right`, and with
    /// three cards offset 2 is `Left`.
    ///
    /// # Panics
    ///
    /// Panics if `count` is 0.
    #[must_use]
    pub fn for_card(card: usize, current: usize, count: usize) -> Self {
        assert!(count > 0, "slot mapping needs at least one card");
        let offset = (card % count + count - current % count) % count;
        match offset {
            0 => Self::Center,
            1 => Self::Right,
            o if o == count - 1 => Self::Left,
            2 => Self::FarRight,
            _ => Self::FarLeft,
        }
    }

    /// CSS class applied to the card element.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Right => "right",
            Self::FarRight => "far-right",
            Self::Left => "left",
            Self::FarLeft => "far-left",
        }
    }
}

/// Full slot assignment for every card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Centered card.
    pub current: usize,
    /// Slot of card `i` at index `i`.
    pub slots: Vec<Slot>,
    /// Apply without CSS transitions (initial mount, resize).
    pub instant: bool,
}

impl Layout {
    /// Compute the layout for `count` cards centered on `current`.
    #[must_use]
    pub fn compute(current: usize, count: usize, instant: bool) -> Self {
        let slots = (0..count)
            .map(|card| Slot::for_card(card, current, count))
            .collect();
        Self {
            current,
            slots,
            instant,
        }
    }

    /// Number of cards.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the layout holds no cards.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot of one card, if it exists.
    #[must_use]
    pub fn slot_of(&self, card: usize) -> Option<Slot> {
        self.slots.get(card).copied()
    }

    /// Iterate `(card, slot)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Slot)> + '_ {
        self.slots.iter().copied().enumerate()
    }

    /// Class names in card order.
    #[must_use]
    pub fn class_names(&self) -> Vec<&'static str> {
        self.slots.iter().map(|s| s.class_name()).collect()
    }
}

/// Receiver of layout requests.
///
/// Called synchronously after every committed index change and on explicit
/// relayouts.
pub trait LayoutSink {
    fn request_layout(&mut self, layout: &Layout);
}

/// Discards layout requests.
impl LayoutSink for () {
    fn request_layout(&mut self, _layout: &Layout) {}
}

/// Records every layout request, in order.
impl LayoutSink for Vec<Layout> {
    fn request_layout(&mut self, layout: &Layout) {
        self.push(layout.clone());
    }
}

impl<F> LayoutSink for F
where
    F: FnMut(&Layout),
{
    fn request_layout(&mut self, layout: &Layout) {
        self(layout);
    }
}
