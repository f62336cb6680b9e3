#[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
use crossterm::style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor};
#[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
use std::fmt::Write;

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Success,
    Error,
    Info,
    Warning,
    Debug,
    Action,
}

/// Diagnostic sink. Prints by default; `capture()` keeps lines in memory instead.
#[derive(Debug, Clone, Default)]
pub struct Logger {
    captured: Option<Rc<RefCell<Vec<String>>>>,
}

impl Logger {
    pub fn new() -> Self {
        Self { captured: None }
    }

    /// Logger that records plain `[LEVEL] message` lines instead of printing
    pub fn capture() -> Self {
        Self {
            captured: Some(Rc::new(RefCell::new(Vec::new()))),
        }
    }

    /// Lines recorded so far (empty unless built with `capture`)
    pub fn lines(&self) -> Vec<String> {
        self.captured
            .as_ref()
            .map(|lines| lines.borrow().clone())
            .unwrap_or_default()
    }

    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        self.print_line(level, message.as_ref());
    }

    pub fn log_with_details<I, S>(&self, level: LogLevel, message: impl AsRef<str>, details: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.print_line(level, message.as_ref());
        for detail in details {
            self.print_detail(detail.as_ref());
        }
    }

    pub fn success(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Success, message);
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    pub fn action(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Action, message);
    }

    fn print_detail(&self, detail: &str) {
        if let Some(lines) = &self.captured {
            lines.borrow_mut().push(format!("   -> {}", detail));
            return;
        }
        #[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
        {
            println!("   ↳ {}", detail);
        }
        #[cfg(all(target_arch = "wasm32", feature = "wasm"))]
        {
            web_sys::console::log_1(&format!("   -> {}", detail).into());
        }
        #[cfg(not(any(
            all(feature = "cli", not(target_arch = "wasm32")),
            all(target_arch = "wasm32", feature = "wasm")
        )))]
        {
            println!("   -> {}", detail);
        }
    }

    fn print_line(&self, level: LogLevel, message: &str) {
        if let Some(lines) = &self.captured {
            lines
                .borrow_mut()
                .push(format!("[{}] {}", level.as_label(), message));
            return;
        }
        #[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
        {
            println!("{}", self.render_colored_line(level, message));
        }
        #[cfg(all(target_arch = "wasm32", feature = "wasm"))]
        {
            let line: wasm_bindgen::JsValue = format!("[{}] {}", level.as_label(), message).into();
            match level {
                LogLevel::Error => web_sys::console::error_1(&line),
                LogLevel::Warning => web_sys::console::warn_1(&line),
                _ => web_sys::console::log_1(&line),
            }
        }
        #[cfg(not(any(
            all(feature = "cli", not(target_arch = "wasm32")),
            all(target_arch = "wasm32", feature = "wasm")
        )))]
        {
            println!("[{}] {}", level.as_label(), message);
        }
    }

    #[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
    fn render_colored_line(&self, level: LogLevel, message: &str) -> String {
        let mut out = String::new();
        let (emoji, color) = level.visuals();

        out.push_str(emoji);
        out.push(' ');
        out.push_str(&self.render_signature());
        out.push(' ');
        out.push_str(&self.render_status(level, color));
        out.push(' ');
        out.push_str(message);
        out
    }

    #[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
    fn render_signature(&self) -> String {
        let mut s = String::new();
        let _ = write!(&mut s, "{}", SetForegroundColor(Color::Grey));
        s.push('[');
        let _ = write!(
            &mut s,
            "{}",
            SetForegroundColor(Color::Rgb {
                r: 196,
                g: 154,
                b: 62,
            })
        );
        let _ = write!(&mut s, "{}", SetAttribute(Attribute::Bold));
        s.push_str("Esquire");
        let _ = write!(&mut s, "{}", SetAttribute(Attribute::Reset));
        let _ = write!(&mut s, "{}", SetForegroundColor(Color::Grey));
        s.push(']');
        let _ = write!(&mut s, "{}", ResetColor);
        s
    }

    #[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
    fn render_status(&self, level: LogLevel, color: Color) -> String {
        let mut s = String::new();
        let _ = write!(&mut s, "{}", SetForegroundColor(color));
        let _ = write!(&mut s, "{}", SetAttribute(Attribute::Bold));
        s.push('[');
        s.push_str(level.as_label());
        s.push(']');
        let _ = write!(&mut s, "{}", SetAttribute(Attribute::Reset));
        let _ = write!(&mut s, "{}", ResetColor);
        s
    }
}

impl LogLevel {
    pub fn as_label(self) -> &'static str {
        match self {
            LogLevel::Success => "SUCCESS",
            LogLevel::Error => "ERROR",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Debug => "DEBUG",
            LogLevel::Action => "ACTION",
        }
    }

    #[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
    fn visuals(self) -> (&'static str, Color) {
        match self {
            LogLevel::Success => (
                "✅",
                Color::Rgb {
                    r: 76,
                    g: 175,
                    b: 80,
                },
            ),
            LogLevel::Error => (
                "❌",
                Color::Rgb {
                    r: 244,
                    g: 67,
                    b: 54,
                },
            ),
            LogLevel::Info => (
                "ℹ️ ",
                Color::Rgb {
                    r: 33,
                    g: 150,
                    b: 243,
                },
            ),
            LogLevel::Warning => (
                "⚠️",
                Color::Rgb {
                    r: 255,
                    g: 152,
                    b: 0,
                },
            ),
            LogLevel::Debug => (
                "🛠️",
                Color::Rgb {
                    r: 121,
                    g: 134,
                    b: 203,
                },
            ),
            LogLevel::Action => (
                "📦",
                Color::Rgb {
                    r: 0,
                    g: 188,
                    b: 212,
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_records_plain_lines() {
        let logger = Logger::capture();
        logger.debug("resolved: a,b");
        logger.log_with_details(LogLevel::Error, "load failed", ["db.toml"]);

        assert_eq!(
            logger.lines(),
            vec![
                "[DEBUG] resolved: a,b".to_string(),
                "[ERROR] load failed".to_string(),
                "   -> db.toml".to_string(),
            ]
        );
    }

    #[test]
    fn test_clones_share_the_capture_buffer() {
        let logger = Logger::capture();
        let clone = logger.clone();
        clone.warn("redefined: x");
        assert_eq!(logger.lines(), vec!["[WARN] redefined: x".to_string()]);
    }

    #[test]
    fn test_printing_logger_records_nothing() {
        let logger = Logger::new();
        assert!(logger.lines().is_empty());
    }
}
