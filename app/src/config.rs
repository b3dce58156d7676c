//! Runtime configuration from environment variables (.env supported).
//!
//! Printer host/port and DPI constants are explicit configuration handed
//! to the transform and transport — never compiled-in constants or global
//! mutable state.

use zpl_stream::Strategy;

/// Runtime configuration for one editing session.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub printer_host: String,
    pub printer_port: u16,
    pub printer_dpi: u32,
    pub design_dpi: u32,
    pub send_timeout_ms: u64,
    pub encode_debounce_ms: u64,
    pub strategy: Strategy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            printer_host: "192.168.1.50".into(),
            printer_port: 9100,
            printer_dpi: 304,
            design_dpi: 96,
            send_timeout_ms: 5000,
            encode_debounce_ms: 100,
            strategy: Strategy::PerElement,
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment, with `.env` overrides.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        let g = |key: &str| std::env::var(key).unwrap_or_default();

        Self {
            printer_host: {
                let h = g("PRINTER_HOST");
                if h.is_empty() { defaults.printer_host } else { h }
            },
            printer_port: parse_u16(&g("PRINTER_PORT"), defaults.printer_port),
            printer_dpi: parse_u32(&g("PRINTER_DPI"), defaults.printer_dpi),
            design_dpi: parse_u32(&g("DESIGN_DPI"), defaults.design_dpi),
            send_timeout_ms: parse_u64(&g("SEND_TIMEOUT_MS"), defaults.send_timeout_ms),
            encode_debounce_ms: parse_u64(&g("ENCODE_DEBOUNCE_MS"), defaults.encode_debounce_ms),
            strategy: g("PRINT_STRATEGY").parse().unwrap_or(defaults.strategy),
        }
    }

    /// Printer/design DPI ratio as a floating factor.
    pub fn scale(&self) -> f64 {
        f64::from(self.printer_dpi) / f64::from(self.design_dpi)
    }
}

fn parse_u16(s: &str, default: u16) -> u16 {
    s.parse().unwrap_or(default)
}

fn parse_u32(s: &str, default: u32) -> u32 {
    s.parse().unwrap_or(default)
}

fn parse_u64(s: &str, default: u64) -> u64 {
    s.parse().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let c = AppConfig::default();
        assert_eq!(c.printer_port, 9100);
        assert_eq!(c.encode_debounce_ms, 100);
        assert!((c.scale() - 3.1667).abs() < 1e-3);
        assert_eq!(c.strategy, Strategy::PerElement);
    }

    #[test]
    fn parse_helpers_fall_back_on_garbage() {
        assert_eq!(parse_u16("", 9100), 9100);
        assert_eq!(parse_u16("nope", 9100), 9100);
        assert_eq!(parse_u16("9200", 9100), 9200);
        assert_eq!(parse_u32("600", 304), 600);
        assert_eq!(parse_u64("-1", 5000), 5000);
    }
}
