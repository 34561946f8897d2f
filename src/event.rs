use noisy_float::prelude::*;
use particle_id::ParticleID;
use serde::{Deserialize, Serialize};

use crate::triggers::TriggerDecision;

/// A reconstructed charged-particle track
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Track {
    /// Transverse momentum
    pub pt: N64,
    /// Pseudorapidity
    pub eta: N64,
    /// Azimuthal angle
    pub phi: N64,
    /// Quality flags set by the reconstruction
    #[serde(default)]
    pub filter_bits: u32,
    /// Index of the matched calorimeter cluster in the event's cluster
    /// collection, if any
    #[serde(default)]
    pub cluster: Option<usize>,
    /// Index of the generator-level particle this track was reconstructed
    /// from, if any
    #[serde(default)]
    pub mc_label: Option<usize>,
}

/// An entry of the matched-track collection
///
/// Track matchers either store the track itself or a lightweight summary
/// with re-derived kinematics wrapping the original track. Cluster and
/// label information always lives on the underlying track, reached through
/// [resolve](TrackEntry::resolve).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
pub enum TrackEntry {
    /// A track stored directly
    Track(Track),
    /// Re-derived kinematics wrapping the underlying track
    Summary {
        pt: N64,
        eta: N64,
        phi: N64,
        track: Box<Track>,
    },
}

impl TrackEntry {
    pub fn pt(&self) -> N64 {
        match self {
            Self::Track(track) => track.pt,
            Self::Summary { pt, .. } => *pt,
        }
    }

    pub fn eta(&self) -> N64 {
        match self {
            Self::Track(track) => track.eta,
            Self::Summary { eta, .. } => *eta,
        }
    }

    pub fn phi(&self) -> N64 {
        match self {
            Self::Track(track) => track.phi,
            Self::Summary { phi, .. } => *phi,
        }
    }

    /// Label of the associated generator-level particle, if any
    pub fn mc_label(&self) -> Option<usize> {
        self.resolve().mc_label
    }

    /// The underlying track, with any summary indirection resolved
    pub fn resolve(&self) -> &Track {
        match self {
            Self::Track(track) => track,
            Self::Summary { track, .. } => track,
        }
    }
}

impl From<Track> for TrackEntry {
    fn from(track: Track) -> Self {
        Self::Track(track)
    }
}

/// A calorimeter cluster
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Cluster {
    pub energy: N64,
    pub eta: N64,
    pub phi: N64,
}

/// A generator-level particle
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct McParticle {
    pub pt: N64,
    pub eta: N64,
    pub phi: N64,
    pub pdg_id: ParticleID,
    /// Whether the particle originates directly from the primary
    /// interaction
    pub physical_primary: bool,
}

/// Generator-level information for one event
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct McEvent {
    pub particles: Vec<McParticle>,
    /// Generator weight
    pub weight: N64,
}

impl McEvent {
    /// Resolve a track label to the corresponding particle
    ///
    /// Returns `None` for labels outside the particle collection.
    pub fn particle(&self, label: usize) -> Option<&McParticle> {
        self.particles.get(label)
    }
}

/// Summary information of the reconstructed event
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
pub struct RecSummary {
    /// z position of the reconstructed primary vertex
    pub vertex_z: N64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventBuilder {
    id: usize,
    matched_tracks: Option<Vec<TrackEntry>>,
    clusters: Vec<Cluster>,
    rec: Option<RecSummary>,
    mc: Option<McEvent>,
    triggers: TriggerDecision,
}

impl EventBuilder {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            matched_tracks: Some(Vec::new()),
            clusters: Vec::new(),
            rec: None,
            mc: None,
            triggers: TriggerDecision::default(),
        }
    }

    pub fn add_track(&mut self, entry: impl Into<TrackEntry>) -> &mut Self {
        self.matched_tracks
            .get_or_insert_with(Vec::new)
            .push(entry.into());
        self
    }

    /// Mark the matched-track collection as absent
    ///
    /// This is distinct from an empty collection and is reported as a
    /// configuration error by components that need the collection.
    pub fn without_matched_tracks(&mut self) -> &mut Self {
        self.matched_tracks = None;
        self
    }

    pub fn add_cluster(&mut self, cluster: Cluster) -> &mut Self {
        self.clusters.push(cluster);
        self
    }

    pub fn rec_summary(&mut self, rec: RecSummary) -> &mut Self {
        self.rec = Some(rec);
        self
    }

    pub fn mc_event(&mut self, mc: McEvent) -> &mut Self {
        self.mc = Some(mc);
        self
    }

    pub fn triggers(&mut self, triggers: TriggerDecision) -> &mut Self {
        self.triggers = triggers;
        self
    }

    pub fn build(self) -> EventRecord {
        EventRecord {
            id: self.id,
            matched_tracks: self.matched_tracks,
            clusters: self.clusters,
            rec: self.rec,
            mc: self.mc,
            triggers: self.triggers,
        }
    }
}

impl From<EventBuilder> for EventRecord {
    fn from(b: EventBuilder) -> Self {
        b.build()
    }
}

/// The read-only per-event bundle passed to analysis components
///
/// Created by the external driver for each event and only valid for the
/// duration of processing that event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EventRecord {
    id: usize,
    #[serde(default)]
    matched_tracks: Option<Vec<TrackEntry>>,
    #[serde(default)]
    clusters: Vec<Cluster>,
    #[serde(default)]
    rec: Option<RecSummary>,
    #[serde(default)]
    mc: Option<McEvent>,
    triggers: TriggerDecision,
}

impl EventRecord {
    pub fn id(&self) -> usize {
        self.id
    }

    /// The matched-track collection, `None` if the driver did not attach
    /// one
    pub fn matched_tracks(&self) -> Option<&[TrackEntry]> {
        self.matched_tracks.as_deref()
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Resolve a cluster index from a track to the cluster it points to
    pub fn cluster(&self, idx: usize) -> Option<&Cluster> {
        self.clusters.get(idx)
    }

    pub fn rec_summary(&self) -> Option<&RecSummary> {
        self.rec.as_ref()
    }

    pub fn mc_event(&self) -> Option<&McEvent> {
        self.mc.as_ref()
    }

    pub fn triggers(&self) -> &TriggerDecision {
        &self.triggers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_with_cluster(idx: usize) -> Track {
        Track {
            pt: n64(2.5),
            eta: n64(0.3),
            phi: n64(1.2),
            cluster: Some(idx),
            ..Default::default()
        }
    }

    #[test]
    fn summary_resolves_to_underlying_track() {
        let entry = TrackEntry::Summary {
            pt: n64(2.4),
            eta: n64(0.31),
            phi: n64(1.19),
            track: Box::new(track_with_cluster(7)),
        };
        assert_eq!(entry.pt(), n64(2.4));
        assert_eq!(entry.resolve().cluster, Some(7));
        assert_eq!(entry.mc_label(), None);
    }

    #[test]
    fn out_of_range_label_resolves_to_no_particle() {
        let mc = McEvent {
            particles: vec![
                McParticle {
                    pt: n64(1.),
                    eta: n64(0.),
                    phi: n64(0.),
                    pdg_id: ParticleID::new(211),
                    physical_primary: true,
                };
                5
            ],
            weight: n64(1.),
        };
        assert!(mc.particle(4).is_some());
        assert!(mc.particle(5).is_none());
    }

    #[test]
    fn absent_and_empty_track_collections_differ() {
        let mut builder = EventBuilder::new(0);
        builder.without_matched_tracks();
        let absent = builder.build();
        assert!(absent.matched_tracks().is_none());

        let empty = EventBuilder::new(1).build();
        assert_eq!(empty.matched_tracks(), Some(&[][..]));
    }
}
