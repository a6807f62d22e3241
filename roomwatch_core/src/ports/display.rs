//! Display surface port
//!
//! The dashboard writes into five named text regions, one log list and a
//! transient banner. A surface that lacks a region reports
//! `DisplayError::MissingRegion`; the reactor logs it and keeps going.

use crate::error::DisplayError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named text regions of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Temperature,
    Humidity,
    Light,
    Alarm,
    LightTimer,
    /// Ordered log list
    Log,
    /// Transient notification banner
    Banner,
}

impl Region {
    /// The five text regions
    pub const TEXT: [Region; 5] = [
        Region::Temperature,
        Region::Humidity,
        Region::Light,
        Region::Alarm,
        Region::LightTimer,
    ];

    /// Element id used by the hosted dashboard page
    pub fn element_id(&self) -> &'static str {
        match self {
            Region::Temperature => "temp",
            Region::Humidity => "hum",
            Region::Light => "light",
            Region::Alarm => "alarm",
            Region::LightTimer => "lightTimer",
            Region::Log => "logs",
            Region::Banner => "notif",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

/// Visual emphasis for a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Emphasis {
    #[default]
    Calm,
    Alert,
}

impl Emphasis {
    /// RGB colour of the emphasis
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Emphasis::Calm => (0xbf, 0xef, 0xff),
            Emphasis::Alert => (0xff, 0x6b, 0x6b),
        }
    }
}

/// Port for the dashboard display
pub trait DisplaySurface: Send {
    /// Replace the text of a region
    fn set_text(&mut self, region: Region, text: &str) -> Result<(), DisplayError>;

    /// Change the emphasis of a region
    fn set_emphasis(&mut self, region: Region, emphasis: Emphasis) -> Result<(), DisplayError>;

    /// Replace the log list, first line on top
    fn render_log(&mut self, lines: &[String]) -> Result<(), DisplayError>;

    /// Show the transient banner with `text`
    fn show_banner(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Hide the transient banner
    fn hide_banner(&mut self) -> Result<(), DisplayError>;
}

impl<D: DisplaySurface + ?Sized> DisplaySurface for Box<D> {
    fn set_text(&mut self, region: Region, text: &str) -> Result<(), DisplayError> {
        (**self).set_text(region, text)
    }

    fn set_emphasis(&mut self, region: Region, emphasis: Emphasis) -> Result<(), DisplayError> {
        (**self).set_emphasis(region, emphasis)
    }

    fn render_log(&mut self, lines: &[String]) -> Result<(), DisplayError> {
        (**self).render_log(lines)
    }

    fn show_banner(&mut self, text: &str) -> Result<(), DisplayError> {
        (**self).show_banner(text)
    }

    fn hide_banner(&mut self) -> Result<(), DisplayError> {
        (**self).hide_banner()
    }
}
