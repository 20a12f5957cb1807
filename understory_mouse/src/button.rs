// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mouse buttons and button sets.
//!
//! A [`MouseButton`] crosses serialization boundaries as its integer ordinal
//! (`Left = 0`, `Right = 1`, `Middle = 2`, `Back = 3`, `Forward = 4`) and is
//! decoded the same way; unknown ordinals are rejected with
//! [`InvalidMouseButton`].

/// A physical mouse button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum MouseButton {
    /// Primary button. The only button forwarded to native touch handlers.
    Left = 0,
    /// Secondary button.
    Right = 1,
    /// Wheel button.
    Middle = 2,
    /// First extra button, usually "back".
    Back = 3,
    /// Second extra button, usually "forward".
    Forward = 4,
}

impl MouseButton {
    /// All buttons in ordinal order.
    pub const ALL: [Self; 5] = [
        Self::Left,
        Self::Right,
        Self::Middle,
        Self::Back,
        Self::Forward,
    ];

    /// The integer ordinal used when the button is serialized.
    pub const fn ordinal(self) -> u8 {
        self as u8
    }
}

/// Error returned when decoding an ordinal that names no button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid mouse button ordinal {0}")]
pub struct InvalidMouseButton(pub u8);

impl TryFrom<u8> for MouseButton {
    type Error = InvalidMouseButton;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(InvalidMouseButton(value))
    }
}

impl From<MouseButton> for u8 {
    fn from(button: MouseButton) -> Self {
        button.ordinal()
    }
}

bitflags::bitflags! {
    /// A set of mouse buttons, e.g. the buttons a node currently holds.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct MouseButtons: u8 {
        /// [`MouseButton::Left`].
        const LEFT = 1 << 0;
        /// [`MouseButton::Right`].
        const RIGHT = 1 << 1;
        /// [`MouseButton::Middle`].
        const MIDDLE = 1 << 2;
        /// [`MouseButton::Back`].
        const BACK = 1 << 3;
        /// [`MouseButton::Forward`].
        const FORWARD = 1 << 4;
    }
}

impl From<MouseButton> for MouseButtons {
    fn from(button: MouseButton) -> Self {
        Self::from_bits_retain(1 << button.ordinal())
    }
}

impl MouseButtons {
    /// True if `button` is in the set.
    pub fn has(self, button: MouseButton) -> bool {
        self.contains(button.into())
    }

    /// Add `button` to the set.
    pub fn add(&mut self, button: MouseButton) {
        self.insert(button.into());
    }

    /// Remove `button` from the set. Removing an absent button is a no-op.
    pub fn discard(&mut self, button: MouseButton) {
        self.remove(button.into());
    }

    /// Iterate the buttons in the set in ordinal order.
    pub fn buttons(self) -> impl Iterator<Item = MouseButton> {
        MouseButton::ALL.into_iter().filter(move |b| self.has(*b))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for MouseButton {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.ordinal())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for MouseButton {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ordinal = u8::deserialize(deserializer)?;
        Self::try_from(ordinal).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn ordinals_round_trip() {
        for button in MouseButton::ALL {
            assert_eq!(MouseButton::try_from(button.ordinal()), Ok(button));
        }
        assert_eq!(MouseButton::try_from(5), Err(InvalidMouseButton(5)));
        assert_eq!(u8::from(MouseButton::Middle), 2);
    }

    #[test]
    fn buttons_are_totally_ordered_by_ordinal() {
        let mut shuffled = [
            MouseButton::Forward,
            MouseButton::Left,
            MouseButton::Back,
            MouseButton::Right,
            MouseButton::Middle,
        ];
        shuffled.sort();
        assert_eq!(shuffled, MouseButton::ALL);
    }

    #[test]
    fn button_set_add_discard() {
        let mut held = MouseButtons::empty();
        held.add(MouseButton::Left);
        held.add(MouseButton::Back);
        assert!(held.has(MouseButton::Left));
        assert!(!held.has(MouseButton::Right));
        assert_eq!(
            held.buttons().collect::<Vec<_>>(),
            [MouseButton::Left, MouseButton::Back]
        );

        held.discard(MouseButton::Right);
        held.discard(MouseButton::Left);
        assert_eq!(held, MouseButtons::BACK);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_integer_ordinal() {
        for button in MouseButton::ALL {
            let json = serde_json::to_string(&button).unwrap();
            assert_eq!(json, alloc::format!("{}", button.ordinal()));
            let back: MouseButton = serde_json::from_str(&json).unwrap();
            assert_eq!(back, button);
        }
        assert!(serde_json::from_str::<MouseButton>("9").is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn button_set_serde_round_trip() {
        let held = MouseButtons::LEFT | MouseButtons::FORWARD;
        let json = serde_json::to_string(&held).unwrap();
        let back: MouseButtons = serde_json::from_str(&json).unwrap();
        assert_eq!(back, held);
    }
}
