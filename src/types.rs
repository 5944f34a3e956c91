use core::fmt;

/// Pressure reported by [`TouchSample::new`] when the controller has no Z channel.
pub const DEFAULT_PRESSURE: u16 = 128;
/// Contact area reported by [`TouchSample::new`] when the controller has no size estimate.
pub const DEFAULT_AREA: u16 = 10;

/// [`TouchSample::with_pressure`] estimates area as `pressure / PRESSURE_AREA_DIVISOR`.
pub const PRESSURE_AREA_DIVISOR: u16 = 5;

/// One raw contact report as delivered by the touch controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchSample {
    pub x: i16,
    pub y: i16,
    pub timestamp_ms: u64,
    pub pressure: u16,
    pub area: u16,
    pub valid: bool,
}

impl TouchSample {
    pub const fn new(x: i16, y: i16, timestamp_ms: u64) -> Self {
        Self {
            x,
            y,
            timestamp_ms,
            pressure: DEFAULT_PRESSURE,
            area: DEFAULT_AREA,
            valid: true,
        }
    }

    /// Area is estimated from pressure when the controller only reports Z.
    ///
    /// Firm presses therefore look large. A config whose pressure floor maps
    /// above its area limit rejects every such sample, see
    /// [`FilterConfig::accepts_pressure_derived_area`](crate::FilterConfig::accepts_pressure_derived_area).
    pub const fn with_pressure(x: i16, y: i16, pressure: u16, timestamp_ms: u64) -> Self {
        Self {
            x,
            y,
            timestamp_ms,
            pressure,
            area: pressure / PRESSURE_AREA_DIVISOR,
            valid: true,
        }
    }

    /// A "no contact" report, used to close an ongoing touch.
    pub const fn released(timestamp_ms: u64) -> Self {
        Self {
            x: 0,
            y: 0,
            timestamp_ms,
            pressure: 0,
            area: 0,
            valid: false,
        }
    }

    pub const fn area(mut self, area: u16) -> Self {
        self.area = area;
        self
    }

    pub const fn pressure(mut self, pressure: u16) -> Self {
        self.pressure = pressure;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u16,
    pub height: u16,
}

impl ScreenSize {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, x: i16, y: i16) -> bool {
        x >= 0 && y >= 0 && (x as u16) < self.width && (y as u16) < self.height
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanelKind {
    #[default]
    Capacitive,
    Resistive,
}

impl PanelKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Capacitive => "Capacitive",
            Self::Resistive => "Resistive",
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle view of the accepted sample stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TouchEvent {
    #[default]
    None,
    Start,
    Move,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    OutOfBounds,
    /// The report carries no contact (`valid == false`).
    NoContact,
    LowPressure,
    Bounce,
    GestureLocked,
    LargeArea,
    ZoneBurst,
    ZoneSpread,
    StaticDwell,
    TooManyContacts,
    Cluster,
    Streak,
}

impl RejectReason {
    /// Water-like rejections are the ones counted in the rejected statistic.
    /// Bounds, no-contact and gate rejections are not.
    pub const fn is_water(self) -> bool {
        matches!(
            self,
            Self::LargeArea
                | Self::ZoneBurst
                | Self::ZoneSpread
                | Self::StaticDwell
                | Self::TooManyContacts
                | Self::Cluster
                | Self::Streak
        )
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OutOfBounds => "out_of_bounds",
            Self::NoContact => "no_contact",
            Self::LowPressure => "low_pressure",
            Self::Bounce => "bounce",
            Self::GestureLocked => "gesture_locked",
            Self::LargeArea => "large_area",
            Self::ZoneBurst => "zone_burst",
            Self::ZoneSpread => "zone_spread",
            Self::StaticDwell => "static_dwell",
            Self::TooManyContacts => "too_many_contacts",
            Self::Cluster => "cluster",
            Self::Streak => "streak",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOutcome {
    Accepted,
    /// Same contact seen again inside the debounce window. Reported as accepted
    /// but leaves no trace in history, zones, or statistics.
    Repeat,
    Rejected(RejectReason),
}

impl FilterOutcome {
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted | Self::Repeat)
    }

    pub const fn reject_reason(self) -> Option<RejectReason> {
        match self {
            Self::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The batch as a whole looked like water; no sample was inspected.
    Rejected(RejectReason),
    /// Samples were filtered one by one.
    Filtered { accepted: u8, rejected: u8 },
}

impl BatchOutcome {
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Filtered { accepted, .. } if accepted > 0)
    }
}
