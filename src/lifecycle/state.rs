//! Transition table of the booking lifecycle.

use crate::models::BookingStatus;

/// A requested change to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Create,
    CheckIn,
    CheckOut,
    Cancel,
}

/// What a transition does to the booked room, in the same unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomEffect {
    /// available -> occupied
    Occupy,
    Keep,
    /// occupied -> available; a room that is no longer occupied is left alone
    Release,
}

impl LifecycleEvent {
    /// States the event may be applied from. `Create` has none: it starts a booking.
    pub fn allowed_from(self) -> &'static [BookingStatus] {
        use BookingStatus::*;
        match self {
            LifecycleEvent::Create => &[],
            LifecycleEvent::CheckIn => &[Confirmed],
            LifecycleEvent::CheckOut => &[CheckedIn],
            LifecycleEvent::Cancel => &[Confirmed, CheckedIn],
        }
    }

    pub fn target(self) -> BookingStatus {
        match self {
            LifecycleEvent::Create => BookingStatus::Confirmed,
            LifecycleEvent::CheckIn => BookingStatus::CheckedIn,
            LifecycleEvent::CheckOut => BookingStatus::CheckedOut,
            LifecycleEvent::Cancel => BookingStatus::Cancelled,
        }
    }

    pub fn room_effect(self) -> RoomEffect {
        match self {
            LifecycleEvent::Create => RoomEffect::Occupy,
            LifecycleEvent::CheckIn => RoomEffect::Keep,
            LifecycleEvent::CheckOut | LifecycleEvent::Cancel => RoomEffect::Release,
        }
    }

    /// Next status when applied to a booking in `from`, or `None` if not allowed.
    pub fn next(self, from: BookingStatus) -> Option<BookingStatus> {
        self.allowed_from().contains(&from).then(|| self.target())
    }

    pub fn verb(self) -> &'static str {
        match self {
            LifecycleEvent::Create => "create",
            LifecycleEvent::CheckIn => "check in",
            LifecycleEvent::CheckOut => "check out",
            LifecycleEvent::Cancel => "cancel",
        }
    }
}
