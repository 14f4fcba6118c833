use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geometry of the pedigree layout, in SVG px.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub symbol_size: f32,
    pub spouse_gap: f32,
    pub unit_gap: f32,
    /// Floor the gap compressor may shrink unit gaps to. Only has an effect
    /// while it stays below `unit_gap`.
    pub min_unit_gap: f32,
    pub generation_gap: f32,
    pub margin_x: f32,
    pub margin_y: f32,
    /// Added to `symbol_size` to get the spacing between siblings.
    pub child_spacing_extra: f32,
    /// Room below the last generation for annotation text.
    pub canvas_bottom_pad: f32,
}

impl LayoutConfig {
    pub fn child_spacing(&self) -> f32 {
        self.symbol_size + self.child_spacing_extra
    }

    pub fn couple_offset(&self) -> f32 {
        self.symbol_size + self.spouse_gap
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            symbol_size: 40.0,
            spouse_gap: 80.0,
            unit_gap: 80.0,
            min_unit_gap: 20.0,
            generation_gap: 120.0,
            margin_x: 60.0,
            margin_y: 40.0,
            child_spacing_extra: 36.0,
            canvas_bottom_pad: 80.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub stroke_width: f32,
    pub show_legend: bool,
    /// Column at which free-text annotations are wrapped.
    pub wrap_chars: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
            stroke_width: 2.0,
            show_legend: false,
            wrap_chars: 18,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::clinical();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<NumberOrString>,
    line_color: Option<String>,
    text_color: Option<String>,
    muted_text_color: Option<String>,
    affected_fill: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().parse::<f32>().ok(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    symbol_size: Option<f32>,
    spouse_gap: Option<f32>,
    unit_gap: Option<f32>,
    min_unit_gap: Option<f32>,
    generation_gap: Option<f32>,
    margin_x: Option<f32>,
    margin_y: Option<f32>,
    child_spacing_extra: Option<f32>,
    canvas_bottom_pad: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    stroke_width: Option<f32>,
    show_legend: Option<bool>,
    wrap_chars: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "clinical" || theme_name == "default" {
            config.theme = Theme::clinical();
        } else {
            tracing::debug!(theme = theme_name, "unknown theme name, keeping default");
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size.as_ref().and_then(NumberOrString::as_f32) {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.muted_text_color {
            config.theme.muted_text_color = v;
        }
        if let Some(v) = vars.affected_fill {
            config.theme.affected_fill = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.symbol_size {
            config.layout.symbol_size = v;
        }
        if let Some(v) = layout.spouse_gap {
            config.layout.spouse_gap = v;
        }
        if let Some(v) = layout.unit_gap {
            config.layout.unit_gap = v;
        }
        if let Some(v) = layout.min_unit_gap {
            config.layout.min_unit_gap = v;
        }
        if let Some(v) = layout.generation_gap {
            config.layout.generation_gap = v;
        }
        if let Some(v) = layout.margin_x {
            config.layout.margin_x = v;
        }
        if let Some(v) = layout.margin_y {
            config.layout.margin_y = v;
        }
        if let Some(v) = layout.child_spacing_extra {
            config.layout.child_spacing_extra = v;
        }
        if let Some(v) = layout.canvas_bottom_pad {
            config.layout.canvas_bottom_pad = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.stroke_width {
            config.render.stroke_width = v;
        }
        if let Some(v) = render.show_legend {
            config.render.show_legend = v;
        }
        if let Some(v) = render.wrap_chars {
            config.render.wrap_chars = v;
        }
    }

    config.render.background = config.theme.background.clone();

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_charting_geometry() {
        let config = LayoutConfig::default();
        assert_eq!(config.child_spacing(), 76.0);
        assert_eq!(config.couple_offset(), 120.0);
        assert!(config.min_unit_gap < config.unit_gap);
    }

    #[test]
    fn parses_partial_overrides() {
        let config = parse_config(
            r##"{
                "theme": "modern",
                "themeVariables": { "fontSize": "13", "lineColor": "#333" },
                "layout": { "unitGap": 100, "minUnitGap": 10 },
                "render": { "showLegend": true }
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.font_size, 13.0);
        assert_eq!(config.theme.line_color, "#333");
        assert_eq!(config.layout.unit_gap, 100.0);
        assert_eq!(config.layout.min_unit_gap, 10.0);
        assert_eq!(config.layout.symbol_size, 40.0);
        assert!(config.render.show_legend);
        assert_eq!(config.render.background, Theme::modern().background);
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.generation_gap, 120.0);
        assert!(!config.render.show_legend);
    }
}
