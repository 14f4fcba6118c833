use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub line_color: String,
    pub text_color: String,
    pub muted_text_color: String,
    pub affected_fill: String,
    pub background: String,
}

impl Theme {
    /// Black-on-white charting style used in clinical documents.
    pub fn clinical() -> Self {
        Self {
            font_family: "Arial, Helvetica, sans-serif".to_string(),
            font_size: 11.0,
            line_color: "#000".to_string(),
            text_color: "#000".to_string(),
            muted_text_color: "#666".to_string(),
            affected_fill: "#000".to_string(),
            background: "#fff".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 11.0,
            line_color: "#1C2430".to_string(),
            text_color: "#1C2430".to_string(),
            muted_text_color: "#7A8AA6".to_string(),
            affected_fill: "#1C2430".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::clinical()
    }
}
