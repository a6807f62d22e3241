//! Line-oriented terminal display
//!
//! Prints one line per region update. Good for pipes and plain terminals;
//! the manager has a full-screen TUI for interactive use.

use colored::*;
use roomwatch_core::error::DisplayError;
use roomwatch_core::ports::{DisplaySurface, Emphasis, Region};
use std::collections::HashSet;
use std::io::{self, Stdout, Write};

pub struct ConsoleDisplay<W: Write + Send = Stdout> {
    out: W,
    hidden: HashSet<Region>,
    alarm_text: String,
    alarm_emphasis: Emphasis,
    banner: Option<String>,
}

impl ConsoleDisplay<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            hidden: HashSet::new(),
            alarm_text: String::new(),
            alarm_emphasis: Emphasis::Calm,
            banner: None,
        }
    }

    /// Leave `region` out of the layout; updates to it fail as missing
    pub fn without(mut self, region: Region) -> Self {
        self.hidden.insert(region);
        self
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn check(&self, region: Region) -> Result<(), DisplayError> {
        if self.hidden.contains(&region) {
            return Err(DisplayError::MissingRegion(region));
        }
        Ok(())
    }

    fn line(&mut self, region: Region, text: ColoredString) -> Result<(), DisplayError> {
        let tag = format!("[{}]", region.element_id());
        writeln!(self.out, "{:>12} {}", tag.dimmed(), text)
            .and_then(|_| self.out.flush())
            .map_err(|e| DisplayError::Unavailable(e.to_string()))
    }

    fn paint_alarm(&mut self) -> Result<(), DisplayError> {
        let (r, g, b) = self.alarm_emphasis.rgb();
        let text = match self.alarm_emphasis {
            Emphasis::Alert => self.alarm_text.truecolor(r, g, b).bold(),
            Emphasis::Calm => self.alarm_text.truecolor(r, g, b),
        };
        self.line(Region::Alarm, text)
    }
}

impl<W: Write + Send> DisplaySurface for ConsoleDisplay<W> {
    fn set_text(&mut self, region: Region, text: &str) -> Result<(), DisplayError> {
        self.check(region)?;
        if region == Region::Alarm {
            self.alarm_text = text.to_string();
            return self.paint_alarm();
        }
        self.line(region, text.normal())
    }

    fn set_emphasis(&mut self, region: Region, emphasis: Emphasis) -> Result<(), DisplayError> {
        self.check(region)?;
        if region != Region::Alarm || emphasis == self.alarm_emphasis {
            return Ok(());
        }
        self.alarm_emphasis = emphasis;
        self.paint_alarm()
    }

    fn render_log(&mut self, lines: &[String]) -> Result<(), DisplayError> {
        self.check(Region::Log)?;
        // Only the newest line; the full list would flood the terminal
        let newest = lines.first().map(String::as_str).unwrap_or_default();
        self.line(Region::Log, newest.cyan())
    }

    fn show_banner(&mut self, text: &str) -> Result<(), DisplayError> {
        self.check(Region::Banner)?;
        self.banner = Some(text.to_string());
        self.line(Region::Banner, text.yellow().bold())
    }

    fn hide_banner(&mut self) -> Result<(), DisplayError> {
        self.check(Region::Banner)?;
        self.banner = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(display: ConsoleDisplay<Vec<u8>>) -> String {
        String::from_utf8(display.into_inner()).unwrap()
    }

    #[test]
    fn test_lines_per_region() {
        let mut display = ConsoleDisplay::new(Vec::new());
        display.set_text(Region::Temperature, "Temp: 23 °C").unwrap();
        display.set_text(Region::LightTimer, "Light ON for: 3s").unwrap();
        display.render_log(&["No logs".to_string()]).unwrap();

        let text = output(display);
        assert!(text.contains("[temp]"));
        assert!(text.contains("Temp: 23 °C"));
        assert!(text.contains("[lightTimer]"));
        assert!(text.contains("No logs"));
    }

    #[test]
    fn test_hidden_region_is_missing() {
        let mut display = ConsoleDisplay::new(Vec::new()).without(Region::Humidity);
        assert_eq!(
            display.set_text(Region::Humidity, "Humidity: 40 %"),
            Err(DisplayError::MissingRegion(Region::Humidity))
        );
        assert!(output(display).is_empty());
    }

    #[test]
    fn test_banner_state() {
        let mut display = ConsoleDisplay::new(Vec::new());
        display.show_banner("Light alarm acknowledged").unwrap();
        assert_eq!(display.banner(), Some("Light alarm acknowledged"));
        display.hide_banner().unwrap();
        assert_eq!(display.banner(), None);
    }

    #[test]
    fn test_emphasis_change_repaints_alarm() {
        let mut display = ConsoleDisplay::new(Vec::new());
        display.set_text(Region::Alarm, "Alarm: HIGH").unwrap();
        display.set_emphasis(Region::Alarm, Emphasis::Alert).unwrap();
        // Same emphasis again prints nothing new
        display.set_emphasis(Region::Alarm, Emphasis::Alert).unwrap();

        let text = output(display);
        assert_eq!(text.matches("Alarm: HIGH").count(), 2);
    }
}
