//! Assembly options.

/// How the assembler turns a document into commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// One text field or download/recall pair per element.
    #[default]
    PerElement,
    /// Render the whole composed scene to a single raster and download it
    /// once at the origin. Requires a `SceneRasterizer`.
    WholeCanvas,
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "per-element" | "per_element" => Ok(Strategy::PerElement),
            "whole-canvas" | "whole_canvas" => Ok(Strategy::WholeCanvas),
            other => Err(format!("unknown print strategy {other:?}")),
        }
    }
}

/// Options recorded into the command stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Target (printer) DPI.
    pub printer_dpi: u32,
    /// Source (design) DPI, recorded so the printer-side renderer can
    /// compensate any residual scale mismatch.
    pub design_dpi: u32,
    pub strategy: Strategy,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { printer_dpi: 304, design_dpi: 96, strategy: Strategy::PerElement }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parses_both_spellings() {
        assert_eq!("per-element".parse::<Strategy>().unwrap(), Strategy::PerElement);
        assert_eq!("whole_canvas".parse::<Strategy>().unwrap(), Strategy::WholeCanvas);
        assert!("both".parse::<Strategy>().is_err());
    }
}
