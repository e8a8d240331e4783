//! Well-known system cursor shapes.
//!
//! These are the shapes worth decoding up front: nearly every frame of a
//! broadcast shows one of them, so warming the loader with their handles
//! keeps the first appearance of each from paying for a decode.

use crate::error::CursorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Windows system cursors.
/// Maps to Windows IDC_* cursor constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SystemCursor {
    /// IDC_ARROW - Standard arrow cursor
    Arrow,
    /// IDC_IBEAM - Text selection cursor
    IBeam,
    /// IDC_WAIT - Hourglass/busy cursor
    Wait,
    /// IDC_CROSS - Crosshair cursor
    Cross,
    /// IDC_UPARROW - Up arrow cursor
    UpArrow,
    /// IDC_SIZENWSE - Diagonal resize (NW-SE)
    SizeNWSE,
    /// IDC_SIZENESW - Diagonal resize (NE-SW)
    SizeNESW,
    /// IDC_SIZEWE - Horizontal resize
    SizeWE,
    /// IDC_SIZENS - Vertical resize
    SizeNS,
    /// IDC_SIZEALL - Move cursor (4-way arrow)
    SizeAll,
    /// IDC_NO - Not allowed cursor
    No,
    /// IDC_HAND - Hand/pointer cursor
    Hand,
    /// IDC_APPSTARTING - Arrow with hourglass
    AppStarting,
    /// IDC_HELP - Arrow with question mark
    Help,
    /// IDC_PIN - Pin cursor
    Pin,
    /// IDC_PERSON - Person cursor
    Person,
}

impl SystemCursor {
    /// Every shape, in preload order.
    pub const ALL: [SystemCursor; 16] = [
        Self::Arrow,
        Self::IBeam,
        Self::Wait,
        Self::Cross,
        Self::UpArrow,
        Self::SizeNWSE,
        Self::SizeNESW,
        Self::SizeWE,
        Self::SizeNS,
        Self::SizeAll,
        Self::No,
        Self::Hand,
        Self::AppStarting,
        Self::Help,
        Self::Pin,
        Self::Person,
    ];

    /// Integer resource id passed to `LoadCursorW` (`MAKEINTRESOURCE`).
    pub const fn resource_id(self) -> u16 {
        match self {
            Self::Arrow => 32512,
            Self::IBeam => 32513,
            Self::Wait => 32514,
            Self::Cross => 32515,
            Self::UpArrow => 32516,
            Self::SizeNWSE => 32642,
            Self::SizeNESW => 32643,
            Self::SizeWE => 32644,
            Self::SizeNS => 32645,
            Self::SizeAll => 32646,
            Self::No => 32648,
            Self::Hand => 32649,
            Self::AppStarting => 32650,
            Self::Help => 32651,
            Self::Pin => 32671,
            Self::Person => 32672,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Arrow => "Arrow",
            Self::IBeam => "IBeam",
            Self::Wait => "Wait",
            Self::Cross => "Cross",
            Self::UpArrow => "UpArrow",
            Self::SizeNWSE => "SizeNWSE",
            Self::SizeNESW => "SizeNESW",
            Self::SizeWE => "SizeWE",
            Self::SizeNS => "SizeNS",
            Self::SizeAll => "SizeAll",
            Self::No => "No",
            Self::Hand => "Hand",
            Self::AppStarting => "AppStarting",
            Self::Help => "Help",
            Self::Pin => "Pin",
            Self::Person => "Person",
        }
    }
}

impl fmt::Display for SystemCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SystemCursor {
    type Err = CursorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|cursor| cursor.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CursorError::Other(format!("Unknown system cursor: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_system_cursor_display() {
        assert_eq!(SystemCursor::Arrow.to_string(), "Arrow");
        assert_eq!(SystemCursor::SizeNWSE.to_string(), "SizeNWSE");
    }

    #[test]
    fn test_system_cursor_serde() {
        let json = serde_json::to_string(&SystemCursor::Hand).unwrap();
        assert_eq!(json, "\"Hand\"");

        let parsed: SystemCursor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, SystemCursor::Hand);
    }

    #[test]
    fn test_from_str_round_trips_every_name() {
        for cursor in SystemCursor::ALL {
            assert_eq!(cursor.name().parse::<SystemCursor>().unwrap(), cursor);
        }
        assert_eq!("ibeam".parse::<SystemCursor>().unwrap(), SystemCursor::IBeam);
        assert!("Spraycan".parse::<SystemCursor>().is_err());
    }

    #[test]
    fn test_resource_ids_are_distinct_idc_values() {
        let ids: HashSet<u16> = SystemCursor::ALL.iter().map(|c| c.resource_id()).collect();
        assert_eq!(ids.len(), SystemCursor::ALL.len());
        assert_eq!(SystemCursor::Arrow.resource_id(), 32512);
        assert_eq!(SystemCursor::Person.resource_id(), 32672);
    }
}
