//! Static keyword vocabularies.
//!
//! Each table is built once at startup and matched by case-insensitive
//! substring: a signal label matches if it contains any vocabulary term.

use once_cell::sync::Lazy;

/// An immutable substring-lookup table. Terms are normalized to lowercase
/// when the table is built; callers pass labels in any case.
#[derive(Debug)]
pub struct Vocabulary {
    terms: Vec<String>,
}

impl Vocabulary {
    fn new(terms: &[&str]) -> Self {
        Self {
            terms: terms.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// First vocabulary term contained in the label, in table order.
    pub fn first_match(&self, label: &str) -> Option<&str> {
        let label = label.to_lowercase();
        self.terms
            .iter()
            .find(|term| label.contains(term.as_str()))
            .map(String::as_str)
    }

    /// Whether the label contains any vocabulary term.
    pub fn matches(&self, label: &str) -> bool {
        self.first_match(label).is_some()
    }
}

/// Dangerous hand-held objects.
pub static DANGER: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&[
        "gun", "knife", "weapon", "firearm", "rifle", "pistol", "sword", "blade", "cutting tool",
        "kitchen knife", "dagger", "machete", "scalpel", "razor", "bayonet",
    ])
});

/// Vehicles worth flagging near a protected site.
pub static VEHICLES: Lazy<Vocabulary> =
    Lazy::new(|| Vocabulary::new(&["truck", "van", "suv", "vehicle", "car", "automobile"]));

/// Scene labels that indicate flame or smoke.
pub static FIRE_LABELS: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&[
        "fire",
        "flames",
        "flame",
        "smoke",
        "smoking",
        "wildfire",
        "conflagration",
        "explosion",
        "burning",
        "blaze",
        "ember",
        "spark",
        "ignition",
        "combustion",
    ])
});

/// Localized objects that imply an ignition source.
pub static FIRE_OBJECTS: Lazy<Vocabulary> =
    Lazy::new(|| Vocabulary::new(&["lighter", "match", "torch", "candle", "flame"]));

/// Direct evidence of physical aggression in scene labels.
pub static AGGRESSION_DIRECT: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&[
        "violence",
        "aggression",
        "aggressive",
        "fight",
        "fighting",
        "assault",
        "attack",
        "conflict",
        "combat",
        "brawl",
        "altercation",
        "struggle",
        "hostility",
        "hostile",
        "physical violence",
        "physical altercation",
        "physical conflict",
        "punch",
        "punching",
        "hitting",
        "striking",
        "kicking",
        "wrestling",
        "grappling",
        "scuffle",
        "tussle",
        "melee",
    ])
});

/// Action/tension terms that weigh at full score in the contextual strategy.
pub static ACTION_TERMS: Lazy<Vocabulary> =
    Lazy::new(|| Vocabulary::new(&["action", "tension", "drama", "movement", "motion"]));

/// Posture terms that weigh at half score in the contextual strategy.
pub static POSTURE_TERMS: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&[
        "lying",
        "lying down",
        "on ground",
        "ground",
        "floor",
        "standing",
        "over",
        "above",
        "leaning",
        "bending",
        "arm",
        "arms",
        "raised",
        "extended",
        "outstretched",
    ])
});

/// Labels that caused false positives on live frames (hands, gloves,
/// lab/medical context). Applied only by the live-frame profile.
pub static IGNORED: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&[
        "finger",
        "thumb",
        "nail",
        "hand",
        "glove",
        "medical glove",
        "safety glove",
        "plastic",
        "person",
        "human",
        "skin",
        "science",
        "medical",
        "body part",
        "anatomy",
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match_is_case_insensitive() {
        assert!(DANGER.matches("Kitchen Knife"));
        assert!(DANGER.matches("HANDGUN"));
        assert!(!DANGER.matches("umbrella"));
    }

    #[test]
    fn test_first_match_order() {
        // "handgun" contains "gun"; table order decides the matched term.
        assert_eq!(DANGER.first_match("handgun"), Some("gun"));
        assert_eq!(DANGER.first_match("combat knife"), Some("knife"));
    }

    #[test]
    fn test_vehicle_terms() {
        assert!(VEHICLES.matches("pickup truck"));
        assert!(VEHICLES.matches("Car"));
        assert!(!VEHICLES.matches("bicycle"));
    }

    #[test]
    fn test_fire_terms() {
        assert!(FIRE_LABELS.matches("campfire"));
        assert!(FIRE_LABELS.matches("Smoke"));
        assert!(!FIRE_LABELS.matches("sunset"));
    }

    #[test]
    fn test_ignored_terms() {
        assert!(IGNORED.matches("medical glove"));
        assert!(IGNORED.matches("Thumb"));
        assert!(!IGNORED.matches("pistol"));
    }
}
