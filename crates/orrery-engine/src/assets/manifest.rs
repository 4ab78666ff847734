use serde::{Deserialize, Serialize};

/// Index into the manifest's flattened asset list: textures first, then audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u32);

/// How the host should decode a texture's color values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    #[default]
    Srgb,
    Linear,
}

/// Describes a single texture image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureDescriptor {
    /// Lookup name (e.g., "earth").
    pub name: String,
    /// Relative path (e.g., "textures/earth.jpg").
    pub path: String,
    #[serde(default)]
    pub color_space: ColorSpace,
}

/// Describes an audio asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioDescriptor {
    pub name: String,
    /// Relative path to the audio file.
    pub path: String,
    #[serde(default, rename = "loop")]
    pub looping: bool,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_volume() -> f32 {
    1.0
}

/// Every asset a game needs before its scene can run.
/// Serialized to JSON and handed to the host loader at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetManifest {
    #[serde(default)]
    pub textures: Vec<TextureDescriptor>,
    #[serde(default)]
    pub audio: Vec<AudioDescriptor>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture. Ids are only stable once every texture is added
    /// before any audio, which is the order games build manifests in.
    pub fn add_texture(&mut self, name: &str, path: &str, color_space: ColorSpace) -> AssetId {
        self.textures.push(TextureDescriptor {
            name: name.to_string(),
            path: path.to_string(),
            color_space,
        });
        AssetId(self.textures.len() as u32 - 1)
    }

    pub fn add_audio(&mut self, name: &str, path: &str, looping: bool, volume: f32) -> AssetId {
        self.audio.push(AudioDescriptor {
            name: name.to_string(),
            path: path.to_string(),
            looping,
            volume,
        });
        AssetId((self.textures.len() + self.audio.len()) as u32 - 1)
    }

    pub fn texture(&self, name: &str) -> Option<AssetId> {
        self.textures
            .iter()
            .position(|t| t.name == name)
            .map(|i| AssetId(i as u32))
    }

    pub fn audio(&self, name: &str) -> Option<AssetId> {
        self.audio
            .iter()
            .position(|a| a.name == name)
            .map(|i| AssetId((self.textures.len() + i) as u32))
    }

    pub fn audio_descriptor(&self, id: AssetId) -> Option<&AudioDescriptor> {
        let index = (id.0 as usize).checked_sub(self.textures.len())?;
        self.audio.get(index)
    }

    /// Relative path of any asset.
    pub fn path(&self, id: AssetId) -> Option<&str> {
        let i = id.0 as usize;
        match self.textures.get(i) {
            Some(t) => Some(t.path.as_str()),
            None => self.audio_descriptor(id).map(|a| a.path.as_str()),
        }
    }

    /// Total assets the load barrier waits for.
    pub fn len(&self) -> usize {
        self.textures.len() + self.audio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_textures_then_audio() {
        let mut m = AssetManifest::new();
        let sun = m.add_texture("sun", "textures/sun.jpg", ColorSpace::Srgb);
        let stars = m.add_texture("stars", "textures/stars.jpg", ColorSpace::Linear);
        let music = m.add_audio("music", "music.mp3", true, 0.5);

        assert_eq!(sun, AssetId(0));
        assert_eq!(stars, AssetId(1));
        assert_eq!(music, AssetId(2));
        assert_eq!(m.texture("stars"), Some(stars));
        assert_eq!(m.audio("music"), Some(music));
        assert_eq!(m.path(music), Some("music.mp3"));
        assert_eq!(m.path(AssetId(9)), None);
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn json_uses_host_field_names() {
        let mut m = AssetManifest::new();
        m.add_texture("stars", "textures/stars.jpg", ColorSpace::Linear);
        m.add_audio("music", "music.mp3", true, 0.5);
        let json = m.to_json().unwrap();
        assert!(json.contains(r#""color_space":"linear""#), "{json}");
        assert!(json.contains(r#""loop":true"#), "{json}");
    }

    #[test]
    fn parse_minimal_manifest() {
        let json = r#"{
            "textures": [ { "name": "earth", "path": "textures/earth.jpg" } ]
        }"#;
        let m = AssetManifest::from_json(json).unwrap();
        assert_eq!(m.textures[0].color_space, ColorSpace::Srgb);
        assert!(m.audio.is_empty());
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn audio_defaults() {
        let json = r#"{ "audio": [ { "name": "music", "path": "music.mp3" } ] }"#;
        let m = AssetManifest::from_json(json).unwrap();
        let music = m.audio_descriptor(AssetId(0)).unwrap();
        assert!(!music.looping);
        assert_eq!(music.volume, 1.0);
    }
}
