//! Short-lived presentation effects produced by combat.

use std::time::Duration;

use debugger_core::{config::EffectConfig, EffectSnapshot, VisualEffect};

#[derive(Clone, Copy, Debug)]
struct ActiveEffect {
    effect: VisualEffect,
    remaining: Duration,
}

/// Effects waiting for their display time to run out.
#[derive(Debug)]
pub(crate) struct EffectTimeline {
    entries: Vec<ActiveEffect>,
    beam: Duration,
    impact: Duration,
    splat: Duration,
}

impl EffectTimeline {
    pub(crate) fn new(config: &EffectConfig) -> Self {
        Self {
            entries: Vec::new(),
            beam: Duration::from_millis(config.beam_ms),
            impact: Duration::from_millis(config.impact_ms),
            splat: Duration::from_millis(config.splat_ms),
        }
    }

    pub(crate) fn push(&mut self, effect: VisualEffect) {
        let remaining = match effect {
            VisualEffect::Beam(_) => self.beam,
            VisualEffect::Impact { .. } => self.impact,
            VisualEffect::Splat { .. } => self.splat,
        };
        self.entries.push(ActiveEffect { effect, remaining });
    }

    /// Ages every effect and tears down the ones whose time ran out.
    pub(crate) fn advance(&mut self, dt: Duration) {
        for entry in &mut self.entries {
            entry.remaining = entry.remaining.saturating_sub(dt);
        }
        self.entries.retain(|entry| !entry.remaining.is_zero());
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn snapshots(&self) -> Vec<EffectSnapshot> {
        self.entries
            .iter()
            .map(|entry| EffectSnapshot {
                effect: entry.effect,
                remaining: entry.remaining,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debugger_core::ArchetypeId;
    use glam::Vec2;

    #[test]
    fn effects_expire_after_their_display_time() {
        let mut timeline = EffectTimeline::new(&EffectConfig::default());
        timeline.push(VisualEffect::Impact {
            point: Vec2::ZERO,
            radius: 30.0,
        });
        timeline.push(VisualEffect::Splat {
            center: Vec2::ONE,
            archetype: ArchetypeId::Ant,
        });

        timeline.advance(Duration::from_millis(270));
        assert_eq!(timeline.snapshots().len(), 2);

        timeline.advance(Duration::from_millis(10));
        let remaining = timeline.snapshots();
        assert_eq!(remaining.len(), 1);
        assert!(matches!(remaining[0].effect, VisualEffect::Splat { .. }));
        assert_eq!(remaining[0].remaining, Duration::from_millis(520));
    }
}
