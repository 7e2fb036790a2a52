//! Mock tier backends.
//!
//! Recognition is a substring match of roster names against the artifact's
//! file name; confidences and profile details are drawn at random. Pass a
//! seed to make a run reproducible.

use crate::catalog::Catalog;
use crate::roster::Roster;
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::path::Path;
use trident_core::{
    BackendError, Confidence, Identity, IdentityConfirmer, IdentityResolver, Match,
    Recommendation, Recommender,
};

const FACE_CONFIDENCE: (f32, f32) = (0.85, 0.98);
/// Voice sample names the claimed user.
const VOICE_CLAIMED_CONFIDENCE: (f32, f32) = (0.80, 0.95);
/// Voice sample names some other known user.
const VOICE_OTHER_CONFIDENCE: (f32, f32) = (0.70, 0.85);

// Per-tier salts: one seed, distinct streams.
const FACE_SALT: u64 = 0x0f;
const VOICE_SALT: u64 = 0x1f;
const PRODUCT_SALT: u64 = 0x2f;

fn make_rng(seed: Option<u64>, salt: u64) -> RefCell<StdRng> {
    let rng = match seed {
        Some(s) => StdRng::seed_from_u64(s ^ salt),
        None => StdRng::from_entropy(),
    };
    RefCell::new(rng)
}

fn file_name_lower(artifact: &Path) -> String {
    artifact
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn draw(rng: &RefCell<StdRng>, (lo, hi): (f32, f32)) -> f32 {
    rng.borrow_mut().gen_range(lo..hi)
}

/// Tier 1 mock: recognises roster users named in the image file name.
pub struct MockFaceResolver {
    roster: Roster,
    rng: RefCell<StdRng>,
}

impl MockFaceResolver {
    pub fn new(roster: Roster, seed: Option<u64>) -> Self {
        Self {
            roster,
            rng: make_rng(seed, FACE_SALT),
        }
    }
}

impl IdentityResolver for MockFaceResolver {
    fn resolve(&self, artifact: &Path) -> Result<Option<Match>, BackendError> {
        let name = file_name_lower(artifact);
        let Some(identity) = self.roster.find_in(&name) else {
            tracing::debug!(file = %name, "mock face: unknown");
            return Ok(None);
        };
        Ok(Some(Match::new(identity, draw(&self.rng, FACE_CONFIDENCE))))
    }
}

/// Tier 2 mock: accepts the claimed user if named in the recording's file
/// name, otherwise any roster user named there at a lower confidence.
pub struct MockVoiceConfirmer {
    roster: Roster,
    rng: RefCell<StdRng>,
}

impl MockVoiceConfirmer {
    pub fn new(roster: Roster, seed: Option<u64>) -> Self {
        Self {
            roster,
            rng: make_rng(seed, VOICE_SALT),
        }
    }
}

impl IdentityConfirmer for MockVoiceConfirmer {
    fn confirm(&self, artifact: &Path, claimed: &Identity) -> Result<Option<Match>, BackendError> {
        let name = file_name_lower(artifact);

        if name.contains(&claimed.as_str().to_lowercase()) {
            let c = draw(&self.rng, VOICE_CLAIMED_CONFIDENCE);
            return Ok(Some(Match::new(claimed.clone(), c)));
        }

        match self.roster.find_in(&name) {
            Some(other) => {
                let c = draw(&self.rng, VOICE_OTHER_CONFIDENCE);
                Ok(Some(Match::new(other, c)))
            }
            None => {
                tracing::debug!(file = %name, "mock voice: unknown");
                Ok(None)
            }
        }
    }
}

/// Tier 3 mock: random category and profile details from the catalog.
pub struct MockRecommender {
    catalog: Catalog,
    rng: RefCell<StdRng>,
}

impl MockRecommender {
    pub fn new(catalog: Catalog, seed: Option<u64>) -> Self {
        Self {
            catalog,
            rng: make_rng(seed, PRODUCT_SALT),
        }
    }
}

impl Recommender for MockRecommender {
    fn recommend(&self, identity: &Identity) -> Result<Option<Recommendation>, BackendError> {
        let catalog = &self.catalog;
        let mut rng = self.rng.borrow_mut();

        let (Some(category), Some(platform)) = (
            catalog.categories.choose(&mut *rng),
            catalog.platforms.choose(&mut *rng),
        ) else {
            return Ok(None);
        };

        let confidence = rng.gen_range(catalog.confidence.min..catalog.confidence.max);
        let engagement = rng.gen_range(catalog.engagement.min..catalog.engagement.max);
        let interest = rng.gen_range(catalog.purchase_interest.min..catalog.purchase_interest.max);
        let purchase = rng.gen_range(catalog.average_purchase.min..catalog.average_purchase.max);

        let mut details = IndexMap::new();
        details.insert("Engagement Score".to_string(), engagement.to_string());
        details.insert("Purchase Interest".to_string(), format!("{interest:.1}"));
        details.insert("Average Purchase".to_string(), format!("${purchase}"));
        details.insert("Social Platform".to_string(), platform.clone());

        tracing::debug!(identity = %identity, category = %category, "mock recommendation");

        Ok(Some(Recommendation {
            category: category.clone(),
            confidence: Confidence::new(confidence),
            details,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::embedded().clone()
    }

    fn id(name: &str) -> Identity {
        Identity::new(name).unwrap()
    }

    #[test]
    fn test_face_recognises_roster_user() {
        let face = MockFaceResolver::new(roster(), Some(7));
        let m = face.resolve(Path::new("data/images/Blessing_smile.JPG")).unwrap().unwrap();
        assert_eq!(m.identity.as_str(), "Blessing");
        let c = m.confidence.value();
        assert!((0.85..0.98).contains(&c), "confidence {c} out of range");
    }

    #[test]
    fn test_face_matches_file_name_not_directory() {
        let face = MockFaceResolver::new(roster(), Some(7));
        let m = face.resolve(Path::new("mitali/unknown.jpg")).unwrap();
        assert!(m.is_none());
    }

    #[test]
    fn test_voice_prefers_claimed_user() {
        let voice = MockVoiceConfirmer::new(roster(), Some(7));
        let m = voice
            .confirm(Path::new("mwai_and_liliane.wav"), &id("Liliane"))
            .unwrap()
            .unwrap();
        assert_eq!(m.identity.as_str(), "Liliane");
        assert!((0.80..0.95).contains(&m.confidence.value()));
    }

    #[test]
    fn test_voice_falls_back_to_other_known_user() {
        let voice = MockVoiceConfirmer::new(roster(), Some(7));
        let m = voice.confirm(Path::new("mwai_voice.wav"), &id("Mitali")).unwrap().unwrap();
        assert_eq!(m.identity.as_str(), "Mwai");
        assert!((0.70..0.85).contains(&m.confidence.value()));
    }

    #[test]
    fn test_voice_unknown_recording() {
        let voice = MockVoiceConfirmer::new(roster(), Some(7));
        assert!(voice.confirm(Path::new("noise.wav"), &id("Mitali")).unwrap().is_none());
    }

    #[test]
    fn test_claimed_user_outside_roster() {
        let voice = MockVoiceConfirmer::new(roster(), Some(7));
        let m = voice.confirm(Path::new("alice.wav"), &id("alice")).unwrap().unwrap();
        assert_eq!(m.identity.as_str(), "alice");
    }

    #[test]
    fn test_recommendation_fields() {
        let catalog = Catalog::embedded().unwrap();
        let rec = MockRecommender::new(catalog.clone(), Some(3))
            .recommend(&id("Mitali"))
            .unwrap()
            .unwrap();

        assert!(catalog.categories.contains(&rec.category));
        assert!((0.75..0.92).contains(&rec.confidence.value()));
        let engagement: u32 = rec.details["Engagement Score"].parse().unwrap();
        assert!((60..95).contains(&engagement));
        let interest: f32 = rec.details["Purchase Interest"].parse().unwrap();
        assert!((2.0..=5.0).contains(&interest));
        assert!(rec.details["Average Purchase"].starts_with('$'));
        assert!(catalog.platforms.contains(&rec.details["Social Platform"]));

        let labels: Vec<&str> = rec.details.keys().map(String::as_str).collect();
        assert_eq!(
            labels,
            ["Engagement Score", "Purchase Interest", "Average Purchase", "Social Platform"]
        );
    }

    #[test]
    fn test_seeded_mocks_are_reproducible() {
        let catalog = Catalog::embedded().unwrap();
        let a = MockRecommender::new(catalog.clone(), Some(42));
        let b = MockRecommender::new(catalog, Some(42));
        for _ in 0..5 {
            assert_eq!(a.recommend(&id("Mwai")).unwrap(), b.recommend(&id("Mwai")).unwrap());
        }

        let f1 = MockFaceResolver::new(roster(), Some(42));
        let f2 = MockFaceResolver::new(roster(), Some(42));
        let path = Path::new("mwai.png");
        assert_eq!(f1.resolve(path).unwrap(), f2.resolve(path).unwrap());
    }
}
