//! Keyword classifier deriving the affected body part from a description.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::incident::UNSPECIFIED_BODY_PART;

/// Body part to the keywords that identify it, most specific entries first.
const BODY_PART_KEYWORDS: &[(&str, &[&str])] = &[
    ("Eyes", &["eye", "eyes", "cornea", "eyelid", "vision", "pupil", "retina"]),
    ("Face", &["face", "facial", "cheek", "jaw", "chin", "forehead", "nose", "mouth", "lip", "tooth", "teeth"]),
    ("Head", &["head", "skull", "scalp", "temple", "helmet struck"]),
    ("Ears", &["ear", "ears", "hearing", "eardrum"]),
    ("Neck", &["neck", "cervical", "throat", "nape"]),
    ("Left Hand", &["left hand", "left finger", "left fingers", "left wrist", "left palm", "left thumb"]),
    ("Right Hand", &["right hand", "right finger", "right fingers", "right wrist", "right palm", "right thumb"]),
    ("Left Arm", &["left arm", "left forearm", "left elbow", "left shoulder"]),
    ("Right Arm", &["right arm", "right forearm", "right elbow", "right shoulder"]),
    ("Hands", &["hand", "hands", "finger", "fingers", "wrist", "palm", "thumb", "fingertip", "phalanx"]),
    ("Arms", &["arm", "arms", "forearm", "elbow", "shoulder", "humerus"]),
    ("Torso", &["chest", "thorax", "rib", "ribs", "sternum", "clavicle", "collarbone"]),
    ("Abdomen", &["abdomen", "abdominal", "belly", "stomach"]),
    ("Back", &["back", "lumbar", "spine", "vertebra", "dorsal"]),
    ("Hip", &["hip", "pelvis", "pelvic", "groin"]),
    ("Left Leg", &["left leg", "left thigh", "left knee", "left shin", "left calf"]),
    ("Right Leg", &["right leg", "right thigh", "right knee", "right shin", "right calf"]),
    ("Left Foot", &["left foot", "left ankle", "left heel", "left toe"]),
    ("Right Foot", &["right foot", "right ankle", "right heel", "right toe"]),
    ("Legs", &["leg", "legs", "thigh", "knee", "shin", "calf", "femur", "tibia", "kneecap"]),
    ("Feet", &["foot", "feet", "ankle", "heel", "toe", "toes", "instep"]),
    ("Multiple", &["multiple injuries", "whole body", "polytrauma"]),
];

fn matchers() -> &'static [(&'static str, Regex)] {
    static MATCHERS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    MATCHERS.get_or_init(|| {
        BODY_PART_KEYWORDS
            .iter()
            .filter_map(|(part, keywords)| {
                let alternation = keywords
                    .iter()
                    .map(|k| regex::escape(k))
                    .collect::<Vec<_>>()
                    .join("|");
                Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
                    .ok()
                    .map(|re| (*part, re))
            })
            .collect()
    })
}

/// First body part whose keywords occur as whole words, or `Unspecified`.
pub fn classify(description: &str) -> &'static str {
    if description.trim().is_empty() {
        return UNSPECIFIED_BODY_PART;
    }
    matchers()
        .iter()
        .find(|(_, re)| re.is_match(description))
        .map_or(UNSPECIFIED_BODY_PART, |(part, _)| part)
}
