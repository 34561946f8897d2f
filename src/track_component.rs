use std::rc::Rc;

use derive_builder::Builder;
use log::{debug, trace};
use noisy_float::prelude::*;
use strum::IntoEnumIterator;

use crate::binning::BinningConfig;
use crate::event::{EventRecord, McEvent, McParticle, TrackEntry};
use crate::histogram::Axis;
use crate::selection::{KineCuts, ACCEPT_ALL};
use crate::sink::HistogramSink;
use crate::traits::{AnalysisComponent, ComponentError, EventWeighter, TrackSelection};
use crate::triggers::{resolve_classes, TriggerClass, TriggerMethod};

const CORRELATION_HIST: &str = "hTrackPtCorrelation";

/// Analysis component for reconstructed tracks
///
/// For each trigger class the event is selected by, four histograms are
/// filled per selected track: all tracks, tracks matched to a calorimeter
/// cluster, and both again with generator-level kinematics. A global
/// correlation matrix relates generated and reconstructed transverse
/// momentum.
#[derive(Builder)]
pub struct TrackComponent {
    /// Component name, used to group histograms in the output
    #[builder(setter(into), default = r#""tracks".to_owned()"#)]
    name: String,
    /// Kinematic ranges a candidate has to pass
    #[builder(default)]
    kine_cuts: KineCuts,
    /// Track-quality selection
    #[builder(default = "Rc::new(ACCEPT_ALL)")]
    track_selection: Rc<dyn TrackSelection>,
    /// How trigger classes are resolved
    #[builder(default)]
    trigger_method: TriggerMethod,
    /// Flip the sign of eta in all fill tuples
    #[builder(default)]
    swap_eta: bool,
    /// Only record candidates with an associated generator-level
    /// particle that is a physical primary
    #[builder(default)]
    require_mc_true: bool,
    /// Per-event weighting policy
    #[builder(default, setter(strip_option))]
    weighter: Option<Rc<dyn EventWeighter>>,
    #[builder(default, setter(skip))]
    sink: HistogramSink,
}

impl TrackComponent {
    pub fn builder() -> TrackComponentBuilder {
        TrackComponentBuilder::default()
    }

    /// Fill one track-based histogram
    ///
    /// The tuple is (pt, eta, phi, vertex z, minimum-bias flag). For the
    /// MC variants the kinematic quantities are taken from the associated
    /// generator-level particle instead of the reconstructed candidate.
    fn fill_histogram(
        &mut self,
        name: &str,
        entry: &TrackEntry,
        assoc_mc: Option<&McParticle>,
        vertex_z: N64,
        min_bias: bool,
        weight: N64,
    ) -> Result<(), ComponentError> {
        let (pt, eta, phi) = match assoc_mc {
            Some(mc) => (mc.pt, mc.eta, mc.phi),
            None => (entry.pt(), entry.eta(), entry.phi()),
        };
        let eta = if self.swap_eta { -eta } else { eta };
        let values = [
            pt.abs(),
            eta,
            phi,
            vertex_z,
            if min_bias { n64(1.) } else { n64(0.) },
        ];
        self.sink.fill(name, &values, weight)?;
        Ok(())
    }

    /// Fill the correlation matrix between generated and reconstructed
    /// transverse momentum
    fn fill_correlation(
        &mut self,
        gen: &McParticle,
        rec: &TrackEntry,
        weight: N64,
    ) -> Result<(), ComponentError> {
        let values = [gen.pt.abs(), rec.pt().abs(), rec.eta(), rec.phi()];
        self.sink.fill(CORRELATION_HIST, &values, weight)?;
        Ok(())
    }
}

/// Check whether a candidate is a true signal track
///
/// The label has to resolve within the generator-level collection and
/// the particle has to be a physical primary.
fn mc_true_particle<'a>(entry: &TrackEntry, mc: &'a McEvent) -> Option<&'a McParticle> {
    let particle = entry.mc_label().and_then(|label| mc.particle(label))?;
    particle.physical_primary.then_some(particle)
}

impl AnalysisComponent for TrackComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_histos(&mut self, binning: &BinningConfig) -> Result<(), ComponentError> {
        let pt = binning.get("pt")?;
        let eta = binning.get("eta")?;
        let phi = binning.get("phi")?;
        let zvertex = binning.get("zvertex")?;

        let track_axes = vec![
            Axis::new("pt", pt),
            Axis::new("eta", eta),
            Axis::new("phi", phi),
            Axis::new("zvertex", zvertex),
            Axis::with_edges("mbtrigger", vec![n64(-0.5), n64(0.5), n64(1.5)]),
        ];
        for class in TriggerClass::iter() {
            let title = class.title();
            self.sink.create(
                &format!("hTrackHist{class}"),
                &format!("Track-based data for {title}"),
                track_axes.clone(),
            )?;
            self.sink.create(
                &format!("hTrackInAcceptanceHist{class}"),
                &format!("Track-based data for {title} for tracks matched to EMCal clusters"),
                track_axes.clone(),
            )?;
            self.sink.create(
                &format!("hMCTrackHist{class}"),
                &format!("Track-based data for {title} with MC kinematics"),
                track_axes.clone(),
            )?;
            self.sink.create(
                &format!("hMCTrackInAcceptanceHist{class}"),
                &format!(
                    "Track-based data for {title} with MC kinematics for tracks matched to EMCal clusters"
                ),
                track_axes.clone(),
            )?;
        }

        let corr_axes = vec![
            Axis::new("ptgen", pt),
            Axis::new("ptrec", pt),
            Axis::new("eta", eta),
            Axis::new("phi", phi),
        ];
        self.sink.create(
            CORRELATION_HIST,
            "Correlation matrix for track pt",
            corr_axes,
        )?;
        Ok(())
    }

    fn process(&mut self, event: &EventRecord) -> Result<(), ComponentError> {
        if self.require_mc_true && event.mc_event().is_none() {
            debug!("Event {} has no MC truth, skipping", event.id());
            return Ok(());
        }

        let classes = resolve_classes(event.triggers(), self.trigger_method);

        let tracks = event.matched_tracks().ok_or(ComponentError::MissingTracks)?;
        debug!("Number of matched tracks: {}", tracks.len());
        let vertex_z = event
            .rec_summary()
            .ok_or(ComponentError::MissingRecSummary)?
            .vertex_z;
        let min_bias = event.triggers().min_bias;

        let weight = match (&self.weighter, event.mc_event()) {
            (Some(weighter), Some(mc)) => weighter.event_weight(mc),
            _ => n64(1.),
        };

        for entry in tracks {
            if !self.kine_cuts.is_selected(entry.pt(), entry.eta(), entry.phi()) {
                continue;
            }
            if !self.track_selection.is_accepted(entry.resolve()) {
                trace!("Track not accepted");
                continue;
            }

            let assoc_mc = event
                .mc_event()
                .and_then(|mc| mc_true_particle(entry, mc));
            if self.require_mc_true && assoc_mc.is_none() {
                continue;
            }
            if let Some(gen) = assoc_mc {
                self.fill_correlation(gen, entry, weight)?;
            }

            let has_cluster = entry
                .resolve()
                .cluster
                .and_then(|idx| event.cluster(idx))
                .is_some();

            for class in &classes {
                self.fill_histogram(
                    &format!("hTrackHist{class}"),
                    entry,
                    None,
                    vertex_z,
                    min_bias,
                    weight,
                )?;
                if has_cluster {
                    self.fill_histogram(
                        &format!("hTrackInAcceptanceHist{class}"),
                        entry,
                        None,
                        vertex_z,
                        min_bias,
                        weight,
                    )?;
                }
                if let Some(gen) = assoc_mc {
                    self.fill_histogram(
                        &format!("hMCTrackHist{class}"),
                        entry,
                        Some(gen),
                        vertex_z,
                        min_bias,
                        weight,
                    )?;
                    if has_cluster {
                        self.fill_histogram(
                            &format!("hMCTrackInAcceptanceHist{class}"),
                            entry,
                            Some(gen),
                            vertex_z,
                            min_bias,
                            weight,
                        )?;
                    }
                }
            }
        }
        Ok(())
    }

    fn sink(&self) -> &HistogramSink {
        &self.sink
    }

    fn take_sink(&mut self) -> HistogramSink {
        std::mem::take(&mut self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Cluster, EventBuilder, RecSummary, Track};
    use crate::selection::CutRange;
    use crate::triggers::TriggerDecision;
    use crate::weights::GENERATOR_WEIGHT;
    use particle_id::ParticleID;

    fn test_track() -> Track {
        Track {
            pt: n64(5.),
            eta: n64(0.2),
            phi: n64(1.),
            ..Default::default()
        }
    }

    fn test_event(track: Track) -> EventRecord {
        let mut builder = EventBuilder::new(0);
        builder
            .add_track(track)
            .rec_summary(RecSummary { vertex_z: n64(0.1) })
            .triggers(TriggerDecision {
                min_bias: true,
                jet_high: true,
                ..Default::default()
            });
        builder.build()
    }

    fn primary_pion(pt: f64) -> McParticle {
        McParticle {
            pt: n64(pt),
            eta: n64(0.21),
            phi: n64(0.99),
            pdg_id: ParticleID::new(211),
            physical_primary: true,
        }
    }

    fn ready_component() -> TrackComponent {
        let mut component = TrackComponent::builder().build().unwrap();
        component.create_histos(&BinningConfig::default()).unwrap();
        component
    }

    fn fills(component: &TrackComponent, name: &str) -> f64 {
        component.sink().get(name).unwrap().integral().into()
    }

    #[test]
    fn one_raw_fill_per_matching_trigger_class() {
        let mut component = ready_component();
        component.process(&test_event(test_track())).unwrap();

        assert_eq!(fills(&component, "hTrackHistMinBias"), 1.);
        assert_eq!(fills(&component, "hTrackHistEMCJHigh"), 1.);
        for name in component.sink().names() {
            let expected = matches!(name, "hTrackHistMinBias" | "hTrackHistEMCJHigh");
            let histo = component.sink().get(name).unwrap();
            assert_eq!(histo.n_filled_bins(), usize::from(expected), "{name}");
        }

        // fill tuple is (pt, eta, phi, vertex z, min-bias flag)
        let histo = component.sink().get("hTrackHistMinBias").unwrap();
        let values = [n64(5.), n64(0.2), n64(1.), n64(0.1), n64(1.)];
        let bin: Vec<_> = histo
            .axes()
            .iter()
            .zip(&values)
            .map(|(axis, v)| axis.find_bin(*v))
            .collect();
        assert_eq!(f64::from(histo.value(&bin).sum_w), 1.);
    }

    #[test]
    fn rejected_candidates_fill_nothing() {
        let mut component = TrackComponent::builder()
            .kine_cuts(KineCuts::new(
                CutRange::new(n64(2.), n64(100.)),
                CutRange::open(),
                CutRange::open(),
            ))
            .build()
            .unwrap();
        component.create_histos(&BinningConfig::default()).unwrap();

        let soft = Track {
            pt: n64(1.),
            ..test_track()
        };
        component.process(&test_event(soft)).unwrap();
        for name in component.sink().names() {
            assert_eq!(
                component.sink().get(name).unwrap().n_filled_bins(),
                0,
                "{name}"
            );
        }
    }

    #[test]
    fn unresolvable_label_skips_the_candidate_when_mc_is_required() {
        let mut component = TrackComponent::builder()
            .require_mc_true(true)
            .build()
            .unwrap();
        component.create_histos(&BinningConfig::default()).unwrap();

        let unmatched = Track {
            mc_label: Some(7),
            ..test_track()
        };
        let mut builder = EventBuilder::new(0);
        builder
            .add_track(unmatched)
            .add_track(test_track())
            .rec_summary(RecSummary { vertex_z: n64(0.1) })
            .mc_event(McEvent {
                particles: vec![primary_pion(4.8); 5],
                weight: n64(1.),
            })
            .triggers(TriggerDecision {
                min_bias: true,
                ..Default::default()
            });
        component.process(&builder.build()).unwrap();

        for name in component.sink().names() {
            assert_eq!(
                component.sink().get(name).unwrap().n_filled_bins(),
                0,
                "{name}"
            );
        }
    }

    #[test]
    fn event_without_mc_is_skipped_when_mc_is_required() {
        let mut component = TrackComponent::builder()
            .require_mc_true(true)
            .build()
            .unwrap();
        component.create_histos(&BinningConfig::default()).unwrap();
        component.process(&test_event(test_track())).unwrap();
        assert_eq!(fills(&component, "hTrackHistMinBias"), 0.);
    }

    #[test]
    fn matched_cluster_also_fills_the_in_acceptance_variant() {
        let mut component = ready_component();
        let clustered = Track {
            cluster: Some(0),
            ..test_track()
        };
        let mut builder = EventBuilder::new(0);
        builder
            .add_track(clustered)
            .add_cluster(Cluster {
                energy: n64(4.2),
                eta: n64(0.2),
                phi: n64(1.),
            })
            .rec_summary(RecSummary { vertex_z: n64(0.1) })
            .triggers(TriggerDecision {
                min_bias: true,
                ..Default::default()
            });
        component.process(&builder.build()).unwrap();

        assert_eq!(fills(&component, "hTrackHistMinBias"), 1.);
        assert_eq!(fills(&component, "hTrackInAcceptanceHistMinBias"), 1.);
    }

    #[test]
    fn dangling_cluster_index_only_fills_the_raw_variant() {
        let mut component = ready_component();
        let dangling = Track {
            cluster: Some(3),
            ..test_track()
        };
        component.process(&test_event(dangling)).unwrap();

        assert_eq!(fills(&component, "hTrackHistMinBias"), 1.);
        assert_eq!(fills(&component, "hTrackInAcceptanceHistMinBias"), 0.);
    }

    #[test]
    fn mc_match_fills_correlation_and_mc_variants_with_mc_kinematics() {
        let mut component = ready_component();
        let labelled = Track {
            mc_label: Some(0),
            ..test_track()
        };
        let mut builder = EventBuilder::new(0);
        builder
            .add_track(labelled)
            .rec_summary(RecSummary { vertex_z: n64(0.1) })
            .mc_event(McEvent {
                particles: vec![primary_pion(4.8)],
                weight: n64(1.),
            })
            .triggers(TriggerDecision {
                min_bias: true,
                ..Default::default()
            });
        component.process(&builder.build()).unwrap();

        assert_eq!(fills(&component, "hTrackHistMinBias"), 1.);
        assert_eq!(fills(&component, CORRELATION_HIST), 1.);
        let mc_histo = component.sink().get("hMCTrackHistMinBias").unwrap();
        assert_eq!(f64::from(mc_histo.integral()), 1.);
        let values = [n64(4.8), n64(0.21), n64(0.99), n64(0.1), n64(1.)];
        let bin: Vec<_> = mc_histo
            .axes()
            .iter()
            .zip(&values)
            .map(|(axis, v)| axis.find_bin(*v))
            .collect();
        assert_eq!(f64::from(mc_histo.value(&bin).sum_w), 1.);
    }

    #[test]
    fn secondary_particles_are_not_mc_matches() {
        let mut component = TrackComponent::builder()
            .require_mc_true(true)
            .build()
            .unwrap();
        component.create_histos(&BinningConfig::default()).unwrap();

        let secondary = McParticle {
            physical_primary: false,
            ..primary_pion(4.8)
        };
        let labelled = Track {
            mc_label: Some(0),
            ..test_track()
        };
        let mut builder = EventBuilder::new(0);
        builder
            .add_track(labelled)
            .rec_summary(RecSummary { vertex_z: n64(0.1) })
            .mc_event(McEvent {
                particles: vec![secondary],
                weight: n64(1.),
            })
            .triggers(TriggerDecision {
                min_bias: true,
                ..Default::default()
            });
        component.process(&builder.build()).unwrap();

        assert_eq!(fills(&component, "hTrackHistMinBias"), 0.);
        assert_eq!(fills(&component, CORRELATION_HIST), 0.);
    }

    #[test]
    fn generator_weight_scales_every_fill() {
        let mut component = TrackComponent::builder()
            .weighter(Rc::new(GENERATOR_WEIGHT))
            .build()
            .unwrap();
        component.create_histos(&BinningConfig::default()).unwrap();

        let mut builder = EventBuilder::new(0);
        builder
            .add_track(test_track())
            .rec_summary(RecSummary { vertex_z: n64(0.1) })
            .mc_event(McEvent {
                particles: Vec::new(),
                weight: n64(2.),
            })
            .triggers(TriggerDecision {
                min_bias: true,
                ..Default::default()
            });
        component.process(&builder.build()).unwrap();

        let histo = component.sink().get("hTrackHistMinBias").unwrap();
        assert_eq!(f64::from(histo.integral()), 2.);
        let (_, content) = histo.iter().next().unwrap();
        assert_eq!(f64::from(content.sum_w2), 4.);
    }

    #[test]
    fn swapped_eta_changes_the_fill_sign() {
        let mut component = TrackComponent::builder()
            .swap_eta(true)
            .build()
            .unwrap();
        component.create_histos(&BinningConfig::default()).unwrap();
        component.process(&test_event(test_track())).unwrap();

        let histo = component.sink().get("hTrackHistMinBias").unwrap();
        let values = [n64(5.), n64(-0.2), n64(1.), n64(0.1), n64(1.)];
        let bin: Vec<_> = histo
            .axes()
            .iter()
            .zip(&values)
            .map(|(axis, v)| axis.find_bin(*v))
            .collect();
        assert_eq!(f64::from(histo.value(&bin).sum_w), 1.);
    }

    #[test]
    fn missing_collections_are_reported() {
        let mut component = ready_component();

        let mut builder = EventBuilder::new(0);
        builder.without_matched_tracks().rec_summary(RecSummary {
            vertex_z: n64(0.1),
        });
        assert!(matches!(
            component.process(&builder.build()),
            Err(ComponentError::MissingTracks)
        ));

        let mut builder = EventBuilder::new(1);
        builder.add_track(test_track());
        assert!(matches!(
            component.process(&builder.build()),
            Err(ComponentError::MissingRecSummary)
        ));
    }

    #[test]
    fn event_order_does_not_change_the_result() {
        let soft = Track {
            pt: n64(0.7),
            eta: n64(-0.3),
            phi: n64(2.),
            ..Default::default()
        };
        let events = [test_event(test_track()), test_event(soft)];

        let mut forward = ready_component();
        for event in &events {
            forward.process(event).unwrap();
        }
        let mut backward = ready_component();
        for event in events.iter().rev() {
            backward.process(event).unwrap();
        }
        assert_eq!(forward.take_sink(), backward.take_sink());
    }
}
