//! This module contains traits and structs that provide interactivity of a map.
//!
//! The front-end converts browser or window events into [`UserEvent`]s with geographic
//! coordinates and gives them to a [`UserEventHandler`], usually through
//! [`Viewer::handle_event`](crate::viewer::Viewer::handle_event).

use geolens_types::geo::GeoPoint2d;
use maybe_sync::{MaybeSend, MaybeSync};

use crate::surface::MapSurface;

/// User input handler.
pub trait UserEventHandler<S: MapSurface> {
    /// Handle the event.
    fn handle(&mut self, event: &UserEvent, surface: &mut S) -> EventPropagation;
}

impl<S, T> UserEventHandler<S> for T
where
    S: MapSurface,
    T: for<'a> FnMut(&'a UserEvent, &'a mut S) -> EventPropagation + MaybeSync + MaybeSend,
{
    fn handle(&mut self, event: &UserEvent, surface: &mut S) -> EventPropagation {
        self(event, surface)
    }
}

/// User interaction event.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum UserEvent {
    /// A mouse button was clicked at the given geographic position.
    Click(MouseButton, GeoPoint2d),
    /// A double click was done at the given geographic position.
    DoubleClick(MouseButton, GeoPoint2d),
}

/// Value returned by an [`UserEventHandler`] to indicate the status of the event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventPropagation {
    /// Event should be propagated to the next handler.
    Propagate,
    /// Event should not be propagated to the next handler.
    Stop,
    /// Event was handled and changed the state of the handler.
    Consume,
}

/// Mouse button enum.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Wheel button.
    Middle,
    /// Secondary button.
    Right,
    /// Any other button.
    Other,
}

impl MouseButton {
    /// Converts the DOM `MouseEvent.button` value.
    pub fn from_dom_button(button: i16) -> Self {
        match button {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use geolens_types::latlon;

    use super::*;
    use crate::map::{Map, MapBuilder};

    #[test]
    fn closures_are_handlers() {
        let mut clicks = 0;
        let mut handler = |event: &UserEvent, _map: &mut Map| match event {
            UserEvent::Click(MouseButton::Left, _) => {
                clicks += 1;
                EventPropagation::Consume
            }
            _ => EventPropagation::Propagate,
        };

        let mut map = MapBuilder::default().build();
        let click = UserEvent::Click(MouseButton::Left, latlon!(1.0, 2.0));
        let right = UserEvent::Click(MouseButton::Right, latlon!(1.0, 2.0));

        assert_eq!(handler.handle(&click, &mut map), EventPropagation::Consume);
        assert_eq!(handler.handle(&right, &mut map), EventPropagation::Propagate);
        drop(handler);
        assert_eq!(clicks, 1);
    }

    #[test]
    fn dom_buttons() {
        assert_eq!(MouseButton::from_dom_button(0), MouseButton::Left);
        assert_eq!(MouseButton::from_dom_button(2), MouseButton::Right);
        assert_eq!(MouseButton::from_dom_button(7), MouseButton::Other);
    }
}
