use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Time horizons offered to the visitor, in years.
pub const TIME_FRAME_OPTIONS: [u32; 5] = [10, 15, 20, 25, 30];

/// Regional solar irradiance band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolarResource {
    /// Southwest US
    High,
    /// Most of the US
    #[default]
    Average,
    /// Northeast, Northwest
    Low,
}

impl SolarResource {
    /// Peak sun hours, kWh/m²/day.
    pub fn peak_sun_hours(self) -> Decimal {
        match self {
            SolarResource::High => dec!(5.5),
            SolarResource::Average => dec!(4.2),
            SolarResource::Low => dec!(3.5),
        }
    }
}

/// Direction the roof plane faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoofOrientation {
    #[default]
    South,
    Southeast,
    Southwest,
    East,
    West,
    North,
}

impl RoofOrientation {
    /// Production multiplier relative to a south-facing roof.
    pub fn efficiency(self) -> Decimal {
        match self {
            RoofOrientation::South => Decimal::ONE,
            RoofOrientation::Southeast | RoofOrientation::Southwest => dec!(0.95),
            RoofOrientation::East | RoofOrientation::West => dec!(0.85),
            RoofOrientation::North => dec!(0.6),
        }
    }
}

impl std::str::FromStr for SolarResource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(SolarResource::High),
            "average" => Ok(SolarResource::Average),
            "low" => Ok(SolarResource::Low),
            other => Err(format!(
                "unknown solar resource '{other}' (expected high, average or low)"
            )),
        }
    }
}

impl std::str::FromStr for RoofOrientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "south" => Ok(RoofOrientation::South),
            "southeast" => Ok(RoofOrientation::Southeast),
            "southwest" => Ok(RoofOrientation::Southwest),
            "east" => Ok(RoofOrientation::East),
            "west" => Ok(RoofOrientation::West),
            "north" => Ok(RoofOrientation::North),
            other => Err(format!("unknown roof orientation '{other}'")),
        }
    }
}
