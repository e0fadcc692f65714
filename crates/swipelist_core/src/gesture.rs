//! Per-row swipe state and derived row visuals.
//!
//! # Responsibility
//! - Model the drag/dismiss states a list row moves through.
//! - Compute background, icon and icon scale as pure functions of the drag.
//!
//! # Invariants
//! - `DismissedToStart` and `DismissedToEnd` are terminal until reset.
//! - Visuals depend only on `(RowState, progress)`.

use serde::{Deserialize, Serialize};

/// Fraction of the row width past which a drag targets a dismissal.
pub const DISMISS_THRESHOLD: f32 = 0.5;

/// Direction a row was swiped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissDirection {
    /// Right-to-left swipe: delete.
    EndToStart,
    /// Left-to-right swipe: archive.
    StartToEnd,
}

impl DismissDirection {
    /// Parses UI shell direction labels (`start`/`end`, case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "start" | "to_start" | "end_to_start" | "left" => Some(Self::EndToStart),
            "end" | "to_end" | "start_to_end" | "right" => Some(Self::StartToEnd),
            _ => None,
        }
    }
}

/// Gesture state of one list row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowState {
    #[default]
    Idle,
    DraggingToStart,
    DraggingToEnd,
    DismissedToStart,
    DismissedToEnd,
}

impl RowState {
    pub fn dragging(direction: DismissDirection) -> Self {
        match direction {
            DismissDirection::EndToStart => Self::DraggingToStart,
            DismissDirection::StartToEnd => Self::DraggingToEnd,
        }
    }

    pub fn dismissed(direction: DismissDirection) -> Self {
        match direction {
            DismissDirection::EndToStart => Self::DismissedToStart,
            DismissDirection::StartToEnd => Self::DismissedToEnd,
        }
    }

    pub fn is_dismissed(self) -> bool {
        matches!(self, Self::DismissedToStart | Self::DismissedToEnd)
    }

    /// Dismissal the row would settle into if released now.
    pub fn target(self, progress: f32) -> DismissTarget {
        match self {
            Self::Idle => DismissTarget::Default,
            Self::DraggingToStart if progress >= DISMISS_THRESHOLD => DismissTarget::ToStart,
            Self::DraggingToEnd if progress >= DISMISS_THRESHOLD => DismissTarget::ToEnd,
            Self::DraggingToStart | Self::DraggingToEnd => DismissTarget::Default,
            Self::DismissedToStart => DismissTarget::ToStart,
            Self::DismissedToEnd => DismissTarget::ToEnd,
        }
    }
}

/// Settling target of an in-flight drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissTarget {
    Default,
    ToStart,
    ToEnd,
}

/// RGBA color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Rgba {
    pub const WHITE: Self = Self::opaque(1.0, 1.0, 1.0);
    pub const RED: Self = Self::opaque(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::opaque(0.0, 1.0, 0.0);

    pub const fn opaque(red: f32, green: f32, blue: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowIcon {
    Delete,
    AddCircle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconAlignment {
    CenterStart,
    CenterEnd,
}

/// Background layer drawn behind a dragged row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowVisuals {
    pub background: Rgba,
    pub icon: RowIcon,
    pub icon_alignment: IconAlignment,
    pub icon_scale: f32,
}

impl RowVisuals {
    pub fn for_target(target: DismissTarget) -> Self {
        let background = match target {
            DismissTarget::ToStart => Rgba::RED.with_alpha(0.8),
            DismissTarget::ToEnd => Rgba::GREEN.with_alpha(0.8),
            DismissTarget::Default => Rgba::WHITE,
        };
        let (icon, icon_alignment) = match target {
            DismissTarget::ToEnd => (RowIcon::AddCircle, IconAlignment::CenterStart),
            _ => (RowIcon::Delete, IconAlignment::CenterEnd),
        };
        let icon_scale = if target == DismissTarget::Default {
            0.3
        } else {
            1.3
        };
        Self {
            background,
            icon,
            icon_alignment,
            icon_scale,
        }
    }

    pub fn for_row(state: RowState, progress: f32) -> Self {
        Self::for_target(state.target(progress))
    }
}
