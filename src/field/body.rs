use std::collections::BTreeSet;

use super::space::FieldSpace;

/// Gravity bookkeeping for one body.
///
/// `K` identifies a source: a registry id or an ECS entity. Candidates are kept in a
/// `BTreeSet` so the resolver visits them in a stable order.
#[derive(Clone, Debug)]
pub struct AffectedBody<V, K> {
    candidates: BTreeSet<K>,
    dominant: Option<K>,
    last_distance: f32,
    local_up: V,
    active_fields: u32,
    /// Snap the body's whole orientation to the surface, not just `local_up`.
    pub rotate_to_surface: bool,
}

impl<V: FieldSpace, K> Default for AffectedBody<V, K> {
    fn default() -> Self {
        Self::new(V::UP, false)
    }
}

impl<V: FieldSpace, K> AffectedBody<V, K> {
    pub fn new(local_up: V, rotate_to_surface: bool) -> Self {
        Self {
            candidates: BTreeSet::new(),
            dominant: None,
            last_distance: f32::INFINITY,
            local_up: local_up.try_normalize().unwrap_or(V::UP),
            active_fields: 0,
            rotate_to_surface,
        }
    }

    pub fn local_up(&self) -> V {
        self.local_up
    }

    pub fn last_distance(&self) -> f32 {
        self.last_distance
    }

    /// Number of fields the body is currently inside. Diagnostic only.
    pub fn active_fields(&self) -> u32 {
        self.active_fields
    }

    pub(crate) fn set_local_up(&mut self, local_up: V) {
        self.local_up = local_up;
    }
}

impl<V: FieldSpace, K: Ord + Copy> AffectedBody<V, K> {
    pub fn dominant(&self) -> Option<K> {
        self.dominant
    }

    pub fn candidates(&self) -> impl Iterator<Item = K> + '_ {
        self.candidates.iter().copied()
    }

    pub fn is_candidate(&self, source: K) -> bool {
        self.candidates.contains(&source)
    }

    /// `false` once the last candidate has left.
    pub fn is_tracking(&self) -> bool {
        !self.candidates.is_empty()
    }

    /// Overlap began. Duplicate events for a tracked source are no-ops.
    ///
    /// Returns whether the source was newly added.
    pub fn enter(&mut self, source: K) -> bool {
        let added = self.candidates.insert(source);
        if added {
            self.active_fields += 1;
        }
        added
    }

    /// Overlap ended. Leaving the dominant source forgets it, so the next resolution
    /// accepts any reporting candidate.
    ///
    /// Returns whether the source was tracked.
    pub fn exit(&mut self, source: K) -> bool {
        let removed = self.candidates.remove(&source);
        if removed {
            self.active_fields = self.active_fields.saturating_sub(1);
        }
        if self.dominant == Some(source) {
            self.clear_dominant();
        }
        if self.candidates.is_empty() {
            self.clear_dominant();
        }
        removed
    }

    pub(crate) fn set_dominant(&mut self, source: K, distance: f32) {
        self.dominant = Some(source);
        self.last_distance = distance;
    }

    fn clear_dominant(&mut self) {
        self.dominant = None;
        self.last_distance = f32::INFINITY;
    }
}

#[cfg(test)]
mod tests {
    use bevy::math::Vec3;

    use super::*;

    type Body = AffectedBody<Vec3, u32>;

    #[test]
    fn duplicate_enter_is_idempotent() {
        let mut body = Body::default();
        assert!(body.enter(1));
        assert!(!body.enter(1));
        assert_eq!(body.active_fields(), 1);
        assert_eq!(body.candidates().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn exit_of_dominant_clears_it() {
        let mut body = Body::default();
        body.enter(1);
        body.enter(2);
        body.set_dominant(1, 3.0);

        assert!(body.exit(1));
        assert_eq!(body.dominant(), None);
        assert_eq!(body.last_distance(), f32::INFINITY);
        assert!(body.is_tracking());
        assert_eq!(body.active_fields(), 1);
    }

    #[test]
    fn exit_of_other_source_keeps_dominant() {
        let mut body = Body::default();
        body.enter(1);
        body.enter(2);
        body.set_dominant(1, 3.0);

        body.exit(2);
        assert_eq!(body.dominant(), Some(1));
        assert_eq!(body.last_distance(), 3.0);
    }

    #[test]
    fn exit_of_unknown_source_is_harmless() {
        let mut body = Body::default();
        assert!(!body.exit(7));
        assert_eq!(body.active_fields(), 0);
        assert!(!body.is_tracking());
    }

    #[test]
    fn degenerate_initial_up_falls_back() {
        let body = AffectedBody::<Vec3, u32>::new(Vec3::ZERO, true);
        assert_eq!(body.local_up(), Vec3::Y);
        assert!(body.rotate_to_surface);
    }
}
