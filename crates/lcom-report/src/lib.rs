pub mod json;
pub mod text;

use std::str::FromStr;

use lcom_core::summary::Summary;

/// Selectable output renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Printer {
    Text,
    Json,
}

impl Printer {
    pub fn render(&self, summary: &Summary) -> String {
        match self {
            Printer::Text => text::format_report(summary),
            Printer::Json => json::format_report(summary, false),
        }
    }
}

impl FromStr for Printer {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Printer::Text),
            "json" => Ok(Printer::Json),
            _ => Err(anyhow::anyhow!("unknown printer: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printer_parse() {
        assert_eq!("text".parse::<Printer>().unwrap(), Printer::Text);
        assert_eq!("JSON".parse::<Printer>().unwrap(), Printer::Json);
        assert!("xml".parse::<Printer>().is_err());
    }
}
