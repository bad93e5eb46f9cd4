//! # Weather Condition Classification
//!
//! Maps the provider's numeric weather codes onto a closed set of icon
//! conditions. There are two tables:
//!
//! - **Hourly codes** (`weatherCode`): 4-digit base codes, one condition each
//! - **Full-day codes** (`weatherCodeFullDay`): compound codes such as
//!   "Mostly Cloudy and Light Rain", folded onto the dominant condition
//!
//! Every lookup is total: unknown codes (and the provider's `0` "Unknown")
//! come back as [`Condition::Unmapped`], which has no icon.

/// Icon-level weather condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    ClearDay,
    MostlyClearDay,
    PartlyCloudyDay,
    MostlyCloudy,
    Cloudy,
    Fog,
    FogLight,
    Drizzle,
    Rain,
    RainLight,
    RainHeavy,
    Snow,
    Flurries,
    SnowLight,
    SnowHeavy,
    FreezingDrizzle,
    FreezingRain,
    FreezingRainLight,
    FreezingRainHeavy,
    IcePellets,
    IcePelletsHeavy,
    IcePelletsLight,
    Thunderstorm,
    /// Unknown or unsupported code; nothing is drawn
    Unmapped,
}

use Condition::*;

/// Hourly `weatherCode` table.
const HOURLY_CODES: &[(i32, Condition)] = &[
    (0, Unmapped),
    (1000, ClearDay),
    (1100, MostlyClearDay),
    (1101, PartlyCloudyDay),
    (1102, MostlyCloudy),
    (1001, Cloudy),
    (2000, Fog),
    (2100, FogLight),
    (4000, Drizzle),
    (4001, Rain),
    (4200, RainLight),
    (4201, RainHeavy),
    (5000, Snow),
    (5001, Flurries),
    (5100, SnowLight),
    (5101, SnowHeavy),
    (6000, FreezingDrizzle),
    (6001, FreezingRain),
    (6200, FreezingRainLight),
    (6201, FreezingRainHeavy),
    (7000, IcePellets),
    (7101, IcePelletsHeavy),
    (7102, IcePelletsLight),
    (8000, Thunderstorm),
];

/// Full-day `weatherCodeFullDay` table.
const FULL_DAY_CODES: &[(i32, Condition)] = &[
    (0, Unmapped),
    (1000, ClearDay),
    (1100, MostlyClearDay),
    (1101, PartlyCloudyDay),
    (1102, MostlyCloudy),
    (1001, Cloudy),
    (1103, PartlyCloudyDay), // Partly Cloudy and Mostly Clear
    // Fog
    (2100, FogLight),
    (2101, FogLight),
    (2102, FogLight),
    (2103, FogLight),
    (2106, Fog),
    (2107, Fog),
    (2108, Fog),
    (2000, Fog),
    // Drizzle and rain
    (4204, Drizzle),
    (4203, Drizzle),
    (4205, Drizzle),
    (4000, Drizzle),
    (4200, RainLight),
    (4213, RainLight),
    (4214, RainLight),
    (4215, RainLight),
    (4209, Rain),
    (4208, Rain),
    (4210, Rain),
    (4001, Rain),
    (4211, RainHeavy),
    (4202, RainHeavy),
    (4212, RainHeavy),
    (4201, RainHeavy),
    // Snow
    (5115, Flurries),
    (5116, Flurries),
    (5117, Flurries),
    (5001, Flurries),
    (5100, SnowLight),
    (5102, SnowLight),
    (5103, SnowLight),
    (5104, SnowLight),
    (5122, SnowLight), // Drizzle and Light Snow
    (5105, Snow),
    (5106, Snow),
    (5107, Snow),
    (5000, Snow),
    (5101, SnowHeavy),
    (5119, SnowHeavy),
    (5120, SnowHeavy),
    (5121, SnowHeavy),
    (5110, FreezingDrizzle), // Drizzle and Snow
    (5108, Snow),            // Rain and Snow
    (5114, FreezingRain),    // Snow and Freezing Rain
    (5112, Snow),            // Snow and Ice Pellets
    // Freezing drizzle and freezing rain
    (6000, FreezingDrizzle),
    (6003, FreezingDrizzle),
    (6002, FreezingDrizzle),
    (6004, FreezingDrizzle),
    (6204, FreezingDrizzle),
    (6206, FreezingDrizzle),
    (6205, FreezingRainLight),
    (6203, FreezingRainLight),
    (6209, FreezingRainLight),
    (6200, FreezingRainLight),
    (6213, FreezingRain),
    (6214, FreezingRain),
    (6215, FreezingRain),
    (6001, FreezingRain),
    (6212, FreezingRain),
    (6220, FreezingRain),
    (6222, FreezingRain),
    (6207, FreezingRainHeavy),
    (6202, FreezingRainHeavy),
    (6208, FreezingRainHeavy),
    (6201, FreezingRainHeavy),
    // Ice pellets
    (7110, IcePelletsLight),
    (7111, IcePelletsLight),
    (7112, IcePelletsLight),
    (7102, IcePelletsLight),
    (7108, IcePellets),
    (7107, IcePellets),
    (7109, IcePellets),
    (7000, IcePellets),
    (7105, IcePellets),
    (7106, IcePellets),
    (7115, IcePellets),
    (7117, IcePellets),
    (7103, IcePelletsHeavy),
    (7113, IcePelletsHeavy),
    (7114, IcePelletsHeavy),
    (7116, IcePelletsHeavy),
    (7101, IcePelletsHeavy),
    // Thunderstorms
    (8001, Thunderstorm),
    (8003, Thunderstorm),
    (8002, Thunderstorm),
    (8000, Thunderstorm),
];

fn lookup(table: &[(i32, Condition)], code: i32) -> Condition {
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|&(_, condition)| condition)
        .unwrap_or(Unmapped)
}

impl Condition {
    /// Classify an hourly `weatherCode`.
    pub fn from_hourly_code(code: i32) -> Self {
        lookup(HOURLY_CODES, code)
    }

    /// Classify a daily `weatherCodeFullDay`.
    pub fn from_full_day_code(code: i32) -> Self {
        lookup(FULL_DAY_CODES, code)
    }

    /// Classify `code` against the full-day table when `full_day` is set.
    pub fn classify(code: i32, full_day: bool) -> Self {
        if full_day {
            Self::from_full_day_code(code)
        } else {
            Self::from_hourly_code(code)
        }
    }

    /// Base icon name in the icon directory, or `None` for [`Condition::Unmapped`].
    ///
    /// Names containing `day` have an optional `night` counterpart on disk.
    pub fn asset_name(self) -> Option<&'static str> {
        let name = match self {
            ClearDay => "clear_day",
            MostlyClearDay => "mostly_clear_day",
            PartlyCloudyDay => "partly_cloudy_day",
            MostlyCloudy => "mostly_cloudy",
            Cloudy => "cloudy",
            Fog => "fog",
            FogLight => "fog_light",
            Drizzle => "drizzle",
            Rain => "rain",
            RainLight => "rain_light",
            RainHeavy => "rain_heavy",
            Snow => "snow",
            Flurries => "flurries",
            SnowLight => "snow_light",
            SnowHeavy => "snow_heavy",
            FreezingDrizzle => "freezing_drizzle",
            FreezingRain => "freezing_rain",
            FreezingRainLight => "freezing_rain_light",
            FreezingRainHeavy => "freezing_rain_heavy",
            IcePellets => "ice_pellets",
            IcePelletsHeavy => "ice_pellets_heavy",
            IcePelletsLight => "ice_pellets_light",
            Thunderstorm => "tstorm",
            Unmapped => return None,
        };
        Some(name)
    }
}
