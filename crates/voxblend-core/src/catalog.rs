//! Voice identifiers and the fixed, ordered catalog of known voices.
//!
//! Catalog order is significant: it drives label/grid layout and the
//! deterministic tie-break the normalizer uses when absorbing rounding
//! residuals.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BlendError;

/// Opaque voice identifier (e.g. `af_sarah`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceId(String);

impl VoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VoiceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for VoiceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VoiceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for VoiceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Voices shipped with the Kokoro v1.0 voice pack, in display order.
const KOKORO_V1_VOICES: &[&str] = &[
    // American English
    "af_alloy", "af_aoede", "af_bella", "af_heart", "af_jessica", "af_kore", "af_nicole",
    "af_nova", "af_river", "af_sarah", "af_sky", "am_adam", "am_echo", "am_eric", "am_fenrir",
    "am_liam", "am_michael", "am_onyx", "am_puck", "am_santa",
    // British English
    "bf_alice", "bf_emma", "bf_isabella", "bf_lily", "bm_daniel", "bm_fable", "bm_george",
    "bm_lewis",
    // Spanish, French, Hindi, Italian
    "ef_dora", "em_alex", "em_santa", "ff_siwis", "hf_alpha", "hf_beta", "hm_omega", "hm_psi",
    "if_sara", "im_nicola",
    // Japanese
    "jf_alpha", "jf_gongitsune", "jf_nezumi", "jf_tebukuro", "jm_kumo",
    // Brazilian Portuguese
    "pf_dora", "pm_alex", "pm_santa",
    // Mandarin Chinese
    "zf_xiaobei", "zf_xiaoni", "zf_xiaoxiao", "zf_xiaoyi", "zm_yunjian", "zm_yunxia",
    "zm_yunxi", "zm_yunyang",
];

/// Ordered, duplicate-free set of voices known to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCatalog {
    voices: Vec<VoiceId>,
    index: HashMap<VoiceId, usize>,
}

impl VoiceCatalog {
    /// Build a catalog from an ordered list of identifiers.
    pub fn new<I, V>(voices: I) -> Result<Self, BlendError>
    where
        I: IntoIterator<Item = V>,
        V: Into<VoiceId>,
    {
        let mut ordered = Vec::new();
        let mut index = HashMap::new();
        for voice in voices {
            let voice = voice.into();
            if index.insert(voice.clone(), ordered.len()).is_some() {
                return Err(BlendError::DuplicateVoice(voice.0));
            }
            ordered.push(voice);
        }
        Ok(Self {
            voices: ordered,
            index,
        })
    }

    /// The Kokoro v1.0 catalog (54 voices).
    #[must_use]
    pub fn kokoro_v1() -> Self {
        let voices: Vec<VoiceId> = KOKORO_V1_VOICES.iter().copied().map(VoiceId::from).collect();
        let index = voices
            .iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i))
            .collect();
        Self { voices, index }
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Position of `voice` in catalog order.
    pub fn index_of(&self, voice: &str) -> Option<usize> {
        self.index.get(voice).copied()
    }

    pub fn contains(&self, voice: &str) -> bool {
        self.index.contains_key(voice)
    }

    pub fn get(&self, index: usize) -> Option<&VoiceId> {
        self.voices.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VoiceId> {
        self.voices.iter()
    }

    pub fn as_slice(&self) -> &[VoiceId] {
        &self.voices
    }
}

impl<'a> IntoIterator for &'a VoiceCatalog {
    type Item = &'a VoiceId;
    type IntoIter = std::slice::Iter<'a, VoiceId>;

    fn into_iter(self) -> Self::IntoIter {
        self.voices.iter()
    }
}
