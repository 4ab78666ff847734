/// Counting load barrier over the manifest's assets.
///
/// The host reports each asset as loaded or failed. Once every asset has
/// reported, `poll_ready` yields a `LoadReport` exactly once.

use crate::assets::manifest::{AssetId, AssetManifest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loaded,
    Failed(String),
}

/// Outcome of the whole load, handed to the game when the barrier opens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total: usize,
    pub loaded: Vec<AssetId>,
    pub failed: Vec<(AssetId, String)>,
}

impl LoadReport {
    pub fn is_loaded(&self, id: AssetId) -> bool {
        self.loaded.contains(&id)
    }

    pub fn all_loaded(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct AssetTracker {
    states: Vec<LoadState>,
    /// Path per asset, for status messages.
    paths: Vec<String>,
    settled: usize,
    /// Set once the report has been handed out.
    fired: bool,
}

impl AssetTracker {
    pub fn new(manifest: &AssetManifest) -> Self {
        let paths: Vec<String> = manifest
            .textures
            .iter()
            .map(|t| t.path.clone())
            .chain(manifest.audio.iter().map(|a| a.path.clone()))
            .collect();
        Self {
            states: vec![LoadState::Pending; paths.len()],
            paths,
            settled: 0,
            fired: false,
        }
    }

    pub fn mark_loaded(&mut self, id: AssetId) {
        self.settle(id, LoadState::Loaded);
    }

    pub fn mark_failed(&mut self, id: AssetId, reason: &str) {
        log::warn!("asset {} failed: {}", self.describe(id), reason);
        self.settle(id, LoadState::Failed(reason.to_string()));
    }

    fn settle(&mut self, id: AssetId, state: LoadState) {
        let Some(slot) = self.states.get_mut(id.0 as usize) else {
            log::warn!("ignoring load report for unknown asset {}", id.0);
            return;
        };
        if *slot != LoadState::Pending {
            log::warn!("ignoring duplicate load report for asset {}", id.0);
            return;
        }
        *slot = state;
        self.settled += 1;
    }

    pub fn state(&self, id: AssetId) -> Option<&LoadState> {
        self.states.get(id.0 as usize)
    }

    pub fn is_loaded(&self, id: AssetId) -> bool {
        matches!(self.state(id), Some(LoadState::Loaded))
    }

    /// Every asset has reported (trivially true for an empty manifest).
    pub fn is_complete(&self) -> bool {
        self.settled == self.states.len()
    }

    /// The barrier has fired and the report was handed out.
    pub fn is_ready(&self) -> bool {
        self.fired
    }

    pub fn total(&self) -> usize {
        self.states.len()
    }

    pub fn settled(&self) -> usize {
        self.settled
    }

    /// Returns the report the first time the barrier is complete, `None` otherwise.
    pub fn poll_ready(&mut self) -> Option<LoadReport> {
        if self.fired || !self.is_complete() {
            return None;
        }
        self.fired = true;

        let mut report = LoadReport {
            total: self.states.len(),
            ..LoadReport::default()
        };
        for (i, state) in self.states.iter().enumerate() {
            let id = AssetId(i as u32);
            match state {
                LoadState::Loaded => report.loaded.push(id),
                LoadState::Failed(reason) => report.failed.push((id, reason.clone())),
                LoadState::Pending => {}
            }
        }
        log::info!(
            "assets ready: {} loaded, {} failed",
            report.loaded.len(),
            report.failed.len()
        );
        Some(report)
    }

    /// Loading-status text for the page. Empty once loading succeeded.
    pub fn status_text(&self) -> String {
        let failed: Vec<&str> = self
            .states
            .iter()
            .zip(&self.paths)
            .filter(|(s, _)| matches!(s, LoadState::Failed(_)))
            .map(|(_, path)| path.as_str())
            .collect();
        if !failed.is_empty() {
            return format!("Error loading: {}", failed.join(", "));
        }
        if self.is_complete() {
            String::new()
        } else {
            format!("Loading {} of {}", self.settled, self.states.len())
        }
    }

    fn describe(&self, id: AssetId) -> &str {
        self.paths
            .get(id.0 as usize)
            .map(String::as_str)
            .unwrap_or("<unknown>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::manifest::ColorSpace;

    fn manifest() -> AssetManifest {
        let mut m = AssetManifest::new();
        m.add_texture("sun", "textures/sun.jpg", ColorSpace::Srgb);
        m.add_texture("earth", "textures/earth.jpg", ColorSpace::Srgb);
        m.add_audio("music", "music.mp3", true, 0.5);
        m
    }

    #[test]
    fn fires_once_after_all_report() {
        let mut t = AssetTracker::new(&manifest());
        t.mark_loaded(AssetId(0));
        t.mark_loaded(AssetId(2));
        assert!(t.poll_ready().is_none());
        assert_eq!(t.status_text(), "Loading 2 of 3");

        t.mark_loaded(AssetId(1));
        let report = t.poll_ready().unwrap();
        assert_eq!(report.total, 3);
        assert_eq!(report.loaded.len(), 3);
        assert!(t.is_ready());
        assert!(t.poll_ready().is_none());
        assert_eq!(t.status_text(), "");
    }

    #[test]
    fn failures_still_open_the_barrier() {
        let mut t = AssetTracker::new(&manifest());
        t.mark_loaded(AssetId(0));
        t.mark_failed(AssetId(1), "404");
        t.mark_loaded(AssetId(2));

        assert_eq!(t.status_text(), "Error loading: textures/earth.jpg");
        let report = t.poll_ready().unwrap();
        assert!(!report.all_loaded());
        assert_eq!(report.failed, vec![(AssetId(1), "404".to_string())]);
        assert!(!t.is_loaded(AssetId(1)));
        assert!(report.is_loaded(AssetId(2)));
    }

    #[test]
    fn status_lists_every_failed_path() {
        let mut t = AssetTracker::new(&manifest());
        t.mark_failed(AssetId(0), "404");
        assert_eq!(t.status_text(), "Error loading: textures/sun.jpg");
        t.mark_loaded(AssetId(1));
        t.mark_failed(AssetId(2), "decode error");
        assert_eq!(t.status_text(), "Error loading: textures/sun.jpg, music.mp3");
    }

    #[test]
    fn duplicate_and_unknown_reports_are_ignored() {
        let mut t = AssetTracker::new(&manifest());
        t.mark_loaded(AssetId(0));
        t.mark_loaded(AssetId(0));
        t.mark_failed(AssetId(0), "late");
        t.mark_loaded(AssetId(42));
        assert_eq!(t.settled(), 1);
        assert!(t.is_loaded(AssetId(0)));
    }

    #[test]
    fn empty_manifest_is_ready_immediately() {
        let mut t = AssetTracker::new(&AssetManifest::new());
        assert!(t.is_complete());
        let report = t.poll_ready().unwrap();
        assert_eq!(report.total, 0);
        assert!(t.poll_ready().is_none());
    }
}
