//! Names of the physical quantities a batch can carry.

use core::fmt;
use core::str::FromStr;

/// One array slot of a [`ProblemBatch`](crate::ProblemBatch).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quantity {
    /// Q, m³/s
    Discharge,
    /// I, friction or energy slope, m/m
    Slope,
    /// D, pipe inner diameter, m
    Diameter,
    /// k, absolute wall roughness, m
    Roughness,
    /// ν, kinematic viscosity, m²/s
    Viscosity,
    /// b, channel base width, m
    BaseWidth,
    /// z, side slope 1V:zH
    SideSlope,
    /// n, Manning roughness coefficient
    ManningN,
    /// I0, bed slope, m/m
    BedSlope,
    /// y, flow depth, m
    Depth,
    /// p, weir crest height, m
    CrestHeight,
    /// L, broad-crested weir crest length, m
    CrestLength,
    /// yC, critical depth, m
    CriticalDepth,
    /// y1, approach depth upstream of a weir, m
    ApproachDepth,
    /// Qv, weir discharge, m³/s
    WeirDischarge,
    /// y3, downstream depth at the modular-flow limit, m
    LimitDepth,
}

impl Quantity {
    pub const ALL: [Quantity; 16] = [
        Quantity::Discharge,
        Quantity::Slope,
        Quantity::Diameter,
        Quantity::Roughness,
        Quantity::Viscosity,
        Quantity::BaseWidth,
        Quantity::SideSlope,
        Quantity::ManningN,
        Quantity::BedSlope,
        Quantity::Depth,
        Quantity::CrestHeight,
        Quantity::CrestLength,
        Quantity::CriticalDepth,
        Quantity::ApproachDepth,
        Quantity::WeirDischarge,
        Quantity::LimitDepth,
    ];

    /// Stable snake_case key used in case files and reports.
    pub fn name(self) -> &'static str {
        match self {
            Quantity::Discharge => "discharge",
            Quantity::Slope => "slope",
            Quantity::Diameter => "diameter",
            Quantity::Roughness => "roughness",
            Quantity::Viscosity => "viscosity",
            Quantity::BaseWidth => "base_width",
            Quantity::SideSlope => "side_slope",
            Quantity::ManningN => "manning_n",
            Quantity::BedSlope => "bed_slope",
            Quantity::Depth => "depth",
            Quantity::CrestHeight => "crest_height",
            Quantity::CrestLength => "crest_length",
            Quantity::CriticalDepth => "critical_depth",
            Quantity::ApproachDepth => "approach_depth",
            Quantity::WeirDischarge => "weir_discharge",
            Quantity::LimitDepth => "limit_depth",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Quantity::Discharge => "Q",
            Quantity::Slope => "I",
            Quantity::Diameter => "D",
            Quantity::Roughness => "k",
            Quantity::Viscosity => "ν",
            Quantity::BaseWidth => "b",
            Quantity::SideSlope => "z",
            Quantity::ManningN => "n",
            Quantity::BedSlope => "I0",
            Quantity::Depth => "y",
            Quantity::CrestHeight => "p",
            Quantity::CrestLength => "L",
            Quantity::CriticalDepth => "yC",
            Quantity::ApproachDepth => "y1",
            Quantity::WeirDischarge => "Qv",
            Quantity::LimitDepth => "y3",
        }
    }

    /// SI unit label.
    pub fn unit(self) -> &'static str {
        match self {
            Quantity::Discharge | Quantity::WeirDischarge => "m³/s",
            Quantity::Slope | Quantity::BedSlope => "m/m",
            Quantity::Viscosity => "m²/s",
            Quantity::SideSlope | Quantity::ManningN => "-",
            Quantity::Diameter
            | Quantity::Roughness
            | Quantity::BaseWidth
            | Quantity::Depth
            | Quantity::CrestHeight
            | Quantity::CrestLength
            | Quantity::CriticalDepth
            | Quantity::ApproachDepth
            | Quantity::LimitDepth => "m",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown quantity name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownQuantity(pub String);

impl fmt::Display for UnknownQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown quantity '{}'", self.0)
    }
}

impl std::error::Error for UnknownQuantity {}

impl FromStr for Quantity {
    type Err = UnknownQuantity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quantity::ALL
            .iter()
            .copied()
            .find(|q| q.name() == s)
            .ok_or_else(|| UnknownQuantity(s.to_string()))
    }
}
