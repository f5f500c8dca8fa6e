use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub date_text_color: String,
    pub description_text_color: String,
    pub label_background: String,
    pub label_border: String,
    pub axis_color: String,
    pub axis_track_color: String,
    pub background: String,
}

impl Theme {
    /// Blue-grey palette of the browser widget's default label formatter.
    pub fn classic() -> Self {
        Self {
            font_family: "Roboto, \"Helvetica Neue\", arial, sans-serif".to_string(),
            font_size: 14.0,
            date_text_color: "#263238".to_string(),
            description_text_color: "#546E7A".to_string(),
            label_background: "#FFFFFF".to_string(),
            label_border: "#CFD8DC".to_string(),
            axis_color: "#CFD8DC".to_string(),
            axis_track_color: "#90A4AE".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            date_text_color: "#1C2430".to_string(),
            description_text_color: "#4A5568".to_string(),
            label_background: "#F8FAFF".to_string(),
            label_border: "#C7D2E5".to_string(),
            axis_color: "#D7E0F0".to_string(),
            axis_track_color: "#7A8AA6".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "modern" => Some(Self::modern()),
            "classic" | "default" | "base" => Some(Self::classic()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
