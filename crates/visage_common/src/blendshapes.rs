//! Facial animation frames produced by audio-to-face inference.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One frame of facial animation: named shape weights at one point in time.
///
/// Frames travel as an ordered sequence; temporal order is significant.
/// The wire field for the weight map is `blendshapes`, matching what the
/// inference service returns and what the rendering engine consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendshapeFrame {
    pub frame: u32,
    #[serde(rename = "blendshapes")]
    pub weights: BTreeMap<String, f32>,
}

impl BlendshapeFrame {
    pub fn new(frame: u32) -> Self {
        Self {
            frame,
            weights: BTreeMap::new(),
        }
    }

    pub fn with_weight(mut self, shape: impl Into<String>, weight: f32) -> Self {
        self.weights.insert(shape.into(), weight);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_uses_wire_field_names() {
        let frame = BlendshapeFrame::new(0).with_weight("mouthOpen", 0.5);
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["frame"], 0);
        assert!((json["blendshapes"]["mouthOpen"].as_f64().unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn frame_parses_service_output() {
        let body = r#"{"frame":3,"blendshapes":{"jawOpen":0.25,"mouthSmile":0.1}}"#;
        let frame: BlendshapeFrame = serde_json::from_str(body).unwrap();
        assert_eq!(frame.frame, 3);
        assert_eq!(frame.weights.len(), 2);
    }
}
